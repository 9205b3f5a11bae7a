//! Cache client interface used by higher-level services (sessions, authorized clients).
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command).
///
/// Note:
/// - We keep this independent from `AppError` so callers can decide how to fail
///   (fail-open for login completion, 500 for the session endpoint, etc.).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
}

/// A minimal string-based cache interface.
///
/// Sessions and authorized clients only need `GET`, `SET ... EX` and `DEL`.
/// Implementations are shared behind `Arc<dyn CacheClient>`.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set (or overwrite) a value with TTL.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    // Remove a key. Missing keys are not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Whole seconds a TTL is kept for, at least 1.
///
/// Shared by every backend so a value lives equally long in Valkey and in memory.
pub fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
