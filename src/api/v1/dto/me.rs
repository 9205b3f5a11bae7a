use serde::Serialize;

use crate::api::v1::extractors::AuthSource;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub authorities: Vec<String>,
    pub source: AuthSource,
}
