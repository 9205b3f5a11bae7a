/*
 * Responsibility
 * - 環境変数の読み込み (client id, provider URL, bypass allow-list, session 設定など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PROVIDER_BASE_URL: &str = "https://www.googleapis.com";
const DEFAULT_FRONTEND_CALLBACK_URL: &str = "http://localhost:5173/oauth-callback";
const DEFAULT_BYPASS_PREFIXES: &str = "/oauth2/,/login/";
const DEFAULT_BYPASS_PATHS: &str = "/error,/auth/user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    // Registered client id at the identity provider; tokens for other audiences are rejected.
    pub oauth2_client_id: String,
    pub provider_base_url: Url,
    pub introspection_timeout: Duration,

    pub frontend_callback_url: Url,

    pub bypass_prefixes: Vec<String>,
    pub bypass_paths: Vec<String>,

    // None => in-process cache (development / single instance only)
    pub valkey_url: Option<String>,
    pub session_cookie_name: String,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins =
            parse_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let request_timeout = Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECONDS", 30));

        let oauth2_client_id = std::env::var("OAUTH2_CLIENT_ID")
            .map_err(|_| ConfigError::Missing("OAUTH2_CLIENT_ID"))?;
        if oauth2_client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("OAUTH2_CLIENT_ID"));
        }

        let provider_base_url = std::env::var("OAUTH2_PROVIDER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string());
        let provider_base_url = Url::parse(&provider_base_url)
            .map_err(|_| ConfigError::Invalid("OAUTH2_PROVIDER_BASE_URL"))?;

        let introspection_timeout = non_zero(
            "INTROSPECTION_TIMEOUT_MS",
            Duration::from_millis(env_u64("INTROSPECTION_TIMEOUT_MS", 5_000)),
        )?;

        let frontend_callback_url = std::env::var("FRONTEND_CALLBACK_URL")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_CALLBACK_URL.to_string());
        let frontend_callback_url = Url::parse(&frontend_callback_url)
            .map_err(|_| ConfigError::Invalid("FRONTEND_CALLBACK_URL"))?;

        let bypass_prefixes = parse_list(
            &std::env::var("AUTH_BYPASS_PREFIXES")
                .unwrap_or_else(|_| DEFAULT_BYPASS_PREFIXES.to_string()),
        );
        let bypass_paths = parse_list(
            &std::env::var("AUTH_BYPASS_PATHS").unwrap_or_else(|_| DEFAULT_BYPASS_PATHS.to_string()),
        );

        let valkey_url = std::env::var("VALKEY_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let session_cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "SESSION".to_string());

        // Cache backends round a zero TTL up to one second; refuse it instead.
        let session_ttl = non_zero(
            "SESSION_TTL_SECONDS",
            Duration::from_secs(env_u64("SESSION_TTL_SECONDS", 1_800)),
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            oauth2_client_id,
            provider_base_url,
            introspection_timeout,
            frontend_callback_url,
            bypass_prefixes,
            bypass_paths,
            valkey_url,
            session_cookie_name,
            session_ttl,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn non_zero(key: &'static str, value: Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(value)
}

/// Split a comma-separated value, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" /oauth2/ ,, /login/,"),
            vec!["/oauth2/".to_string(), "/login/".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn default_bypass_lists_cover_handshake_and_fallback_paths() {
        assert_eq!(parse_list(DEFAULT_BYPASS_PREFIXES), vec!["/oauth2/", "/login/"]);
        assert_eq!(parse_list(DEFAULT_BYPASS_PATHS), vec!["/error", "/auth/user"]);
    }

    #[test]
    fn zero_durations_are_rejected() {
        let err = non_zero("SESSION_TTL_SECONDS", Duration::ZERO).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: SESSION_TTL_SECONDS");

        assert_eq!(
            non_zero("SESSION_TTL_SECONDS", Duration::from_secs(1800)).unwrap(),
            Duration::from_secs(1800)
        );
    }

    #[test]
    fn app_env_accepts_short_production_alias() {
        assert!(AppEnv::parse("PROD").is_production());
        assert!(AppEnv::parse("production").is_production());
        assert!(!AppEnv::parse("staging").is_production());
    }
}
