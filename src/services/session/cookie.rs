use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

/// Find the session id carried in the `Cookie` header(s) under `cookie_name`.
///
/// Empty values are treated as absent.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}
