//! Bearer token shape classification and the bypass allow-list.
//!
//! These checks are heuristics, not verification: they only decide whether a token is
//! worth sending to the identity provider. The prefixes and the length threshold are
//! fixed on purpose; downstream behavior depends on these exact boundaries.

use axum::http::{HeaderMap, header};

/// Prefix of tokens minted by the login completion fallback.
pub const INTERNAL_TOKEN_PREFIX: &str = "oauth_";

/// Known prefixes of provider-issued access / refresh tokens.
pub const PROVIDER_TOKEN_PREFIXES: &[&str] = &["ya29.", "1//"];

/// Tokens strictly longer than this are assumed to be provider tokens.
pub const PROVIDER_TOKEN_MIN_LENGTH: usize = 100;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Issued by this service at login completion; left to session auth.
    Internal,
    /// Looks like a provider access token; must be introspected.
    Provider,
    /// Neither; left to session auth.
    Unrecognized,
}

pub fn classify(token: &str) -> TokenKind {
    if token.starts_with(INTERNAL_TOKEN_PREFIX) {
        return TokenKind::Internal;
    }

    let provider_prefix = PROVIDER_TOKEN_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix));

    if provider_prefix || token.len() > PROVIDER_TOKEN_MIN_LENGTH {
        TokenKind::Provider
    } else {
        TokenKind::Unrecognized
    }
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
///
/// The scheme match is case-sensitive. Missing, non-UTF-8 or non-bearer headers yield `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

/// Paths that never go through token logic (login handshake, error page, session fallback).
#[derive(Debug, Clone, Default)]
pub struct BypassPaths {
    prefixes: Vec<String>,
    exact: Vec<String>,
}

impl BypassPaths {
    pub fn new(prefixes: Vec<String>, exact: Vec<String>) -> Self {
        Self { prefixes, exact }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path)
            || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}
