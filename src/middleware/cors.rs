//! CORS policy for the browser frontend.
//!
//! The frontend calls `/auth/user` with its session cookie, so responses allow
//! credentials. Wildcard origins are therefore never used.
//!
//! Policy:
//! - Development: mirror the request origin.
//! - Production: allowlist origins from Config (comma-separated env var). An empty
//!   allowlist allows none.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    let allow_origin = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        })
    } else {
        AllowOrigin::mirror_request()
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
