use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::session::session_id_from_headers;
use crate::state::AppState;

use super::{AuthCtx, AuthSource};

/// Handler で AuthCtx を受け取るための extractor
///
/// 1. bearer middleware が extensions に入れた AuthCtx があればそれを使う
/// 2. なければ session cookie から session user を復元する (internal token / cookie 認証)
/// 3. どちらもなければ 401
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthCtx>() {
            return Ok(AuthCtxExtractor(ctx.clone()));
        }

        let session_id = session_id_from_headers(&parts.headers, &state.session_cookie)
            .ok_or(AppError::Unauthorized)?;

        let email = state
            .sessions
            .load_user(&session_id)
            .await?
            .and_then(|user| user.email)
            .filter(|email| !email.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthCtxExtractor(AuthCtx::new(email, AuthSource::Session)))
    }
}
