/*
 * Responsibility
 * - GET /health (疎通用)
 * - bearer middleware を通るので、不正な provider token 付きだと 401 になる
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
