/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (bearer token 判定), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
