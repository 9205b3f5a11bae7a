use serde::Serialize;

/// Body of `GET /auth/user`. The provider access token is never echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUserResponse {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}
