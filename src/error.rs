/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - bearer token 拒否時の 401 body は固定の形で返す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::cache::CacheError;

/// `error` value of the 401 body returned for rejected bearer tokens.
pub const INVALID_TOKEN_ERROR: &str = "Invalid or expired token";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Body for a bearer token the identity provider refused.
///
/// Frontends match on this exact shape, so it does not use the `ErrorResponse` envelope.
#[derive(Debug, Serialize)]
pub struct InvalidTokenBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid or expired token: {message}")]
    InvalidToken { message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidToken { message } => {
                let body = InvalidTokenBody {
                    error: INVALID_TOKEN_ERROR,
                    message,
                };
                return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        tracing::warn!(error = %e, "cache backend failure");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header;

    async fn json_body(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_token_renders_flat_401_body() {
        let res = AppError::invalid_token("token has expired").into_response();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = json_body(res).await;
        assert_eq!(body["error"], "Invalid or expired token");
        assert_eq!(body["message"], "token has expired");
    }

    #[tokio::test]
    async fn invalid_token_message_is_json_escaped() {
        let res = AppError::invalid_token(r#"bad "quoted" value"#).into_response();
        let body = json_body(res).await;
        assert_eq!(body["message"], r#"bad "quoted" value"#);
    }

    #[tokio::test]
    async fn unauthorized_uses_error_envelope() {
        let res = AppError::Unauthorized.into_response();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}
