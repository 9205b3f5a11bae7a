/*
 * Responsibility
 * - GET /auth/user (session-based fallback)
 * - login completion で session に保存した profile を返す
 * - bearer middleware の bypass 対象
 */
use axum::{Json, extract::State, http::HeaderMap};

use crate::api::v1::dto::session_user::SessionUserResponse;
use crate::error::AppError;
use crate::services::session::session_id_from_headers;
use crate::state::AppState;

pub async fn session_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionUserResponse>, AppError> {
    let session_id =
        session_id_from_headers(&headers, &state.session_cookie).ok_or(AppError::Unauthorized)?;

    let user = state
        .sessions
        .load_user(&session_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let email = user.email.ok_or(AppError::Unauthorized)?;

    Ok(Json(SessionUserResponse {
        email,
        name: user.name,
        picture: user.picture,
    }))
}
