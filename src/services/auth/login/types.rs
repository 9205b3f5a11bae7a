use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use url::Url;

/// A completed third-party login, as handed over by the OAuth2 handshake.
#[derive(Debug, Clone)]
pub struct OAuth2Login {
    /// Client registration the login went through (e.g. `google`).
    pub registration_id: String,
    /// Provider-side principal name (usually the subject id).
    pub principal_name: String,
    /// User attributes returned by the provider.
    pub attributes: Map<String, Value>,
}

impl OAuth2Login {
    /// String attribute, `None` when absent, null or not a string.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// `302 Found` to the frontend callback, carrying the outbound token.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub location: Url,
    pub token: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        (
            StatusCode::FOUND,
            [(header::LOCATION, self.location.to_string())],
        )
            .into_response()
    }
}
