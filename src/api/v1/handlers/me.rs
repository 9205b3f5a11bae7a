/*
 * Responsibility
 * - GET /api/v1/me
 * - bearer token か session で確立された principal を返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        email: ctx.email,
        authorities: ctx.authorities,
        source: ctx.source,
    })
}
