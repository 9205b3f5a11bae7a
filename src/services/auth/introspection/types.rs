use serde::Serialize;

pub const TOKEN_VALID: &str = "token is valid";
pub const TOKEN_EXPIRED: &str = "token has expired";
pub const WRONG_AUDIENCE: &str = "token not issued to this application";
pub const USER_INFO_FAILED: &str = "failed to get user info";

/// Outcome of a tokeninfo call. Built once per validation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenVerdict {
    pub valid: bool,
    pub email: Option<String>,
    pub message: String,
}

impl TokenVerdict {
    pub fn valid(email: Option<String>) -> Self {
        Self {
            valid: true,
            email,
            message: TOKEN_VALID.to_string(),
        }
    }

    pub fn invalid(email: Option<String>, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            email,
            message: message.into(),
        }
    }
}

/// Outcome of a userinfo call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub valid: bool,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub message: String,
}

impl UserProfile {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            email: None,
            name: None,
            picture: None,
            message: message.into(),
        }
    }
}
