/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - bearer middleware が request extensions に格納するか、session から復元する
 *
 * Notes
 * - provider token の検証は middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

use serde::Serialize;

/// How the principal was established for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthSource {
    BearerToken,
    Session,
}

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `email` は provider が確認した利用者の email
/// - `authorities` は現状常に空 (権限付与はこの層では行わない)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub email: String,
    pub authorities: Vec<String>,
    pub source: AuthSource,
}

impl AuthCtx {
    pub fn new(email: impl Into<String>, source: AuthSource) -> Self {
        Self {
            email: email.into(),
            authorities: Vec::new(),
            source,
        }
    }
}
