//! Local response cache
//!
//! Services keep serialized `list`/`get` results here under `<entity>:` keys and
//! drop the whole prefix on every write. Entries also expire after the
//! configured TTL.

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

pub use memory::MemoryCache;

pub type SharedCache = Arc<MemoryCache>;

/// Build the process-wide cache from configuration
pub fn create_cache(config: &CacheConfig) -> SharedCache {
    let ttl = Duration::from_secs(config.ttl_seconds);
    Arc::new(MemoryCache::with_capacity_and_ttl(config.max_capacity, ttl))
}
