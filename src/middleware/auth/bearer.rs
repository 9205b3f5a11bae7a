//! Bearer token filter: classify the token, introspect provider tokens, attach `AuthCtx`.
//!
//! Outcomes per request (exactly one):
//! - pass through untouched (bypass path, no/other header, internal or unrecognized token)
//! - pass through with `AuthCtx` in extensions (provider token accepted)
//! - 401 with the invalid-token body; the inner service is not called
//!
//! Internal (`oauth_`) and unrecognized tokens are left to the session-based
//! authentication downstream (`AuthCtxExtractor`).

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, info, warn};

use crate::api::v1::extractors::{AuthCtx, AuthSource};
use crate::error::AppError;
use crate::services::auth::classifier::{TokenKind, bearer_token, classify};
use crate::state::AppState;

/// Router 全体に bearer filter を掛ける。
///
/// bypass allow-list は full path で判定するので、nest した sub router ではなく
/// 最上位の Router に対して適用すること。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, bearer_middleware))
}

async fn bearer_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if state.bypass.matches(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        return Ok(next.run(req).await);
    };

    match classify(&token) {
        TokenKind::Internal => {
            debug!("internal token format, deferring to session auth");
        }
        TokenKind::Unrecognized => {
            debug!("unrecognized token format, deferring to session auth");
        }
        TokenKind::Provider => {
            let verdict = state.introspector.validate(&token).await;

            if !verdict.valid {
                warn!(reason = %verdict.message, "provider token rejected");
                return Err(AppError::invalid_token(verdict.message));
            }

            match verdict.email.filter(|email| !email.is_empty()) {
                Some(email) => {
                    info!(email = %email, "provider token accepted");
                    req.extensions_mut()
                        .insert(AuthCtx::new(email, AuthSource::BearerToken));
                }
                None => debug!("provider token valid but carries no email"),
            }
        }
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use tower::ServiceExt;

    use crate::services::auth::TokenVerdict;
    use crate::test_support::{FakeIntrospector, state_with};

    async fn probe(req: Request<Body>) -> String {
        req.extensions()
            .get::<AuthCtx>()
            .map(|ctx| ctx.email.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn router(introspector: Arc<FakeIntrospector>) -> Router {
        let state = state_with(introspector);
        let inner = Router::new()
            .route("/api/v1/probe", get(probe))
            .route("/auth/user", get(probe))
            .route("/error", get(probe))
            .route("/oauth2/authorization/google", get(probe))
            .route("/login/oauth2/code/google", get(probe));

        apply(inner, state.clone()).with_state(state)
    }

    async fn send(router: Router, path: &str, authorization: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn accepting() -> Arc<FakeIntrospector> {
        Arc::new(FakeIntrospector::new(TokenVerdict::valid(Some(
            "a@b.com".to_string(),
        ))))
    }

    fn rejecting() -> Arc<FakeIntrospector> {
        Arc::new(FakeIntrospector::new(TokenVerdict::invalid(
            None,
            "invalid_token",
        )))
    }

    #[tokio::test]
    async fn internal_token_skips_introspection() {
        let introspector = rejecting();
        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Bearer oauth_x_at_y.com"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "anonymous");
        assert_eq!(introspector.calls(), 0);
    }

    #[tokio::test]
    async fn provider_prefixed_token_is_introspected_once_and_attached() {
        let introspector = accepting();
        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Bearer ya29.a0AfH6SM"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "a@b.com");
        assert_eq!(introspector.calls(), 1);
        assert_eq!(introspector.last_token().as_deref(), Some("ya29.a0AfH6SM"));
    }

    #[tokio::test]
    async fn long_token_is_introspected_once() {
        let introspector = accepting();
        let token = format!("Bearer {}", "x".repeat(150));
        let res = send(router(introspector.clone()), "/api/v1/probe", Some(token.as_str())).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(introspector.calls(), 1);
    }

    #[tokio::test]
    async fn unrecognized_token_passes_through_unauthenticated() {
        let introspector = rejecting();
        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Bearer short-token"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "anonymous");
        assert_eq!(introspector.calls(), 0);
    }

    #[tokio::test]
    async fn missing_or_foreign_header_passes_through() {
        let introspector = rejecting();

        let res = send(router(introspector.clone()), "/api/v1/probe", None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Basic dXNlcjpwYXNz"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(introspector.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_token_short_circuits_with_401() {
        let introspector = rejecting();
        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Bearer ya29.revoked"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(body["error"], "Invalid or expired token");
        assert_eq!(body["message"], "invalid_token");
        assert_eq!(introspector.calls(), 1);
    }

    #[tokio::test]
    async fn valid_token_without_email_attaches_nothing() {
        let introspector = Arc::new(FakeIntrospector::new(TokenVerdict::valid(None)));
        let res = send(
            router(introspector.clone()),
            "/api/v1/probe",
            Some("Bearer ya29.noemail"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "anonymous");
        assert_eq!(introspector.calls(), 1);
    }

    #[tokio::test]
    async fn bypass_paths_skip_token_logic() {
        let introspector = rejecting();

        for path in [
            "/auth/user",
            "/error",
            "/oauth2/authorization/google",
            "/login/oauth2/code/google",
        ] {
            let res = send(
                router(introspector.clone()),
                path,
                Some("Bearer ya29.revoked"),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK, "{path} should bypass");
        }

        assert_eq!(introspector.calls(), 0);
    }
}
