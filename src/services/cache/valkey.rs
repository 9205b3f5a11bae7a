use async_trait::async_trait;
use std::time::Duration;

use crate::services::cache::client::{CacheClient, CacheError, CacheResult, ttl_seconds};

/// Valkey/Redis-backed cache client.
///
/// Only the operations needed for session attributes and authorized clients
/// are implemented (GET, SET EX, DEL).
#[derive(Clone, Debug)]
pub struct ValkeyClient {
    manager: redis::aio::ConnectionManager,
}

impl ValkeyClient {
    // Create a Valkey client from a URL like `redis://localhost:6379`
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheClient for ValkeyClient {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();

        let resp: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(resp)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        // EX expects integer seconds.
        let seconds = ttl_seconds(ttl);

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        let _: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(())
    }
}
