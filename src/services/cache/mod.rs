pub mod client;
pub mod memory;
pub mod valkey;

pub use client::{CacheClient, CacheError, CacheResult, ttl_seconds};
pub use memory::MemoryCache;
pub use valkey::ValkeyClient;
