use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::types::{
    TOKEN_EXPIRED, TOKEN_VALID, TokenVerdict, USER_INFO_FAILED, UserProfile, WRONG_AUDIENCE,
};

const TOKENINFO_PATH: &str = "/oauth2/v1/tokeninfo";
const USERINFO_PATH: &str = "/oauth2/v2/userinfo";

/// Validates third-party access tokens.
///
/// Implementations never fail: every problem ends up as an invalid verdict, because a
/// fault here would break every authenticated request.
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// Query-based introspection (`tokeninfo`). Used by the bearer middleware.
    async fn validate(&self, token: &str) -> TokenVerdict;

    /// Bearer-based profile lookup (`userinfo`).
    async fn user_info(&self, token: &str) -> UserProfile;
}

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("introspection request timed out")]
    Timeout,
    #[error("introspection request failed: {0}")]
    Transport(reqwest::Error),
    #[error("malformed introspection response: {0}")]
    Malformed(String),
    #[error("invalid provider url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http client setup failed: {0}")]
    Client(reqwest::Error),
}

impl From<reqwest::Error> for IntrospectionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e)
        }
    }
}

/// HTTP introspector for an OAuth2 identity provider exposing
/// `/oauth2/v1/tokeninfo` and `/oauth2/v2/userinfo`.
///
/// Every call goes to the provider: there is no local signature check and no cache.
#[derive(Debug, Clone)]
pub struct ProviderIntrospector {
    http: reqwest::Client,
    tokeninfo_url: Url,
    userinfo_url: Url,
    client_id: String,
}

impl ProviderIntrospector {
    pub fn new(
        provider_base_url: &Url,
        client_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IntrospectionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IntrospectionError::Client)?;

        Ok(Self {
            http,
            tokeninfo_url: provider_base_url.join(TOKENINFO_PATH)?,
            userinfo_url: provider_base_url.join(USERINFO_PATH)?,
            client_id: client_id.into(),
        })
    }

    async fn fetch_tokeninfo(&self, token: &str) -> Result<(StatusCode, Value), IntrospectionError> {
        let mut url = self.tokeninfo_url.clone();
        url.query_pairs_mut().append_pair("access_token", token);

        let response = self.http.get(url).send().await?;
        let status = response.status();

        // The provider reports rejected tokens as 4xx with a JSON `error` field,
        // so the body is parsed whatever the status.
        let body: Value = response.json().await?;
        if !body.is_object() {
            return Err(IntrospectionError::Malformed(
                "expected a JSON object".to_string(),
            ));
        }

        Ok((status, body))
    }

    async fn fetch_userinfo(&self, token: &str) -> Result<Option<Value>, IntrospectionError> {
        let response = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "userinfo lookup rejected");
            return Ok(None);
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl TokenIntrospector for ProviderIntrospector {
    async fn validate(&self, token: &str) -> TokenVerdict {
        match self.fetch_tokeninfo(token).await {
            Ok((status, body)) => evaluate_tokeninfo(status, &body, &self.client_id),
            Err(err) => {
                warn!(error = %err, "token introspection failed");
                TokenVerdict::invalid(None, format!("token validation failed: {err}"))
            }
        }
    }

    async fn user_info(&self, token: &str) -> UserProfile {
        match self.fetch_userinfo(token).await {
            Ok(Some(body)) => UserProfile {
                valid: true,
                email: text_field(&body, "email"),
                name: text_field(&body, "name"),
                picture: text_field(&body, "picture"),
                message: TOKEN_VALID.to_string(),
            },
            Ok(None) => UserProfile::invalid(USER_INFO_FAILED),
            Err(err) => {
                warn!(error = %err, "userinfo lookup failed");
                UserProfile::invalid(format!("token validation failed: {err}"))
            }
        }
    }
}

/// Fold a tokeninfo response into a verdict.
///
/// Order matters: `error` first, then audience, then expiry.
pub fn evaluate_tokeninfo(status: StatusCode, body: &Value, client_id: &str) -> TokenVerdict {
    if let Some(error) = text_field(body, "error") {
        return TokenVerdict::invalid(None, error);
    }

    if !status.is_success() {
        return TokenVerdict::invalid(
            None,
            format!("token validation failed: provider returned {status}"),
        );
    }

    if let Some(audience) = text_field(body, "audience")
        && audience != client_id
    {
        return TokenVerdict::invalid(None, WRONG_AUDIENCE);
    }

    let email = text_field(body, "email");

    if let Some(expires_in) = body.get("expires_in").filter(|v| !v.is_null())
        && seconds(expires_in) <= 0
    {
        return TokenVerdict::invalid(email, TOKEN_EXPIRED);
    }

    TokenVerdict::valid(email)
}

// Present, non-null field as text. Non-string scalars are rendered as JSON.
fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Numeric or numeric-string seconds; anything else counts as 0.
fn seconds(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
