use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::services::cache::{CacheClient, CacheResult};

/// Lookup of the access token a provider issued for a logged-in principal.
///
/// Written by the OAuth2 handshake integration, read at login completion.
/// `Ok(None)` means "no authorized client", which is not an error.
#[async_trait]
pub trait AuthorizedClientStore: Send + Sync {
    async fn load_access_token(
        &self,
        registration_id: &str,
        principal_name: &str,
    ) -> CacheResult<Option<String>>;

    async fn save_access_token(
        &self,
        registration_id: &str,
        principal_name: &str,
        access_token: &str,
        ttl: Duration,
    ) -> CacheResult<()>;
}

/// Cache-backed store keyed `oauth2:authorized_client:<registration id>:<principal name>`.
#[derive(Clone)]
pub struct CachedAuthorizedClientStore {
    cache: Arc<dyn CacheClient>,
    prefix: String,
}

impl CachedAuthorizedClientStore {
    pub fn new(cache: Arc<dyn CacheClient>) -> Self {
        Self {
            cache,
            prefix: "oauth2:authorized_client".to_string(),
        }
    }

    fn key(&self, registration_id: &str, principal_name: &str) -> String {
        format!("{}:{}:{}", self.prefix, registration_id, principal_name)
    }
}

#[async_trait]
impl AuthorizedClientStore for CachedAuthorizedClientStore {
    async fn load_access_token(
        &self,
        registration_id: &str,
        principal_name: &str,
    ) -> CacheResult<Option<String>> {
        self.cache
            .get_string(&self.key(registration_id, principal_name))
            .await
    }

    async fn save_access_token(
        &self,
        registration_id: &str,
        principal_name: &str,
        access_token: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.cache
            .set_with_ttl(&self.key(registration_id, principal_name), access_token, ttl)
            .await
    }
}
