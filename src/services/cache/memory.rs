use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};

use crate::services::cache::client::{CacheClient, CacheResult, ttl_seconds};

/// Default number of entries kept before the least useful ones are evicted.
pub const DEFAULT_CAPACITY: u64 = 100_000;

/// Process-local cache used when no Valkey URL is configured (and in tests).
///
/// Backed by moka: every entry carries its own TTL, expired entries are evicted by
/// moka's housekeeping, and the entry count is bounded. Not shared across instances.
#[derive(Clone, Debug)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expire each entry after the TTL it was written with; overwrites restart the clock.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Entries currently held, after pending evictions are applied.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl: Duration::from_secs(ttl_seconds(ttl)),
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}
