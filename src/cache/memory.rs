//! moka-backed in-memory cache
//!
//! Values are stored as JSON strings so any serializable response can be
//! cached. Bulk invalidation uses glob patterns (`*` and `?`).
//!
//! Every invalidation bumps a generation counter. A reader that fills the
//! cache after a database read passes the generation it saw before the read
//! to `set_fresh`, so a result that raced with a write is never kept.

use anyhow::{Context, Result};
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub struct MemoryCache {
    entries: Cache<String, Arc<String>>,
    default_ttl: Duration,
    generation: AtomicU64,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(DEFAULT_MAX_CAPACITY, DEFAULT_TTL)
    }

    /// Create a cache holding at most `max_capacity` entries, each living `ttl`
    pub fn with_capacity_and_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            default_ttl: ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key).await {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .with_context(|| format!("Failed to deserialize cache entry: {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        self.entries.insert(key.to_string(), Arc::new(json)).await;
        Ok(())
    }

    /// Current invalidation generation; read it before loading from the database
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store `value` only if no invalidation happened since `generation`
    pub async fn set_fresh<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        generation: u64,
    ) -> Result<bool> {
        if self.generation() != generation {
            return Ok(false);
        }
        self.set(key, value).await?;

        // An invalidation that landed between the check and the insert
        if self.generation() != generation {
            self.entries.invalidate(key).await;
            return Ok(false);
        }
        Ok(true)
    }

    /// Drop every entry whose key matches a glob pattern such as `blogs:*`
    pub async fn delete_pattern(&self, pattern: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| glob_matches(pattern, key.as_str()))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        for key in doomed {
            self.entries.invalidate(&key).await;
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Glob match with `*` (any run) and `?` (any one char)
///
/// Iterative with single-star backtracking, so long keys never recurse.
fn glob_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, k));
                p += 1;
            }
            Some(&c) if c == '?' || c == key[k] => {
                p += 1;
                k += 1;
            }
            _ => match star {
                Some((sp, sk)) => {
                    p = sp + 1;
                    k = sk + 1;
                    star = Some((sp, sk + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_matches() {
        assert!(glob_matches("blogs:*", "blogs:list"));
        assert!(glob_matches("blogs:*", "blogs:"));
        assert!(glob_matches("blogs:?", "blogs:7"));
        assert!(glob_matches("*:list", "courses:list"));
        assert!(glob_matches("a*b*c", "axxbyyc"));
        assert!(!glob_matches("blogs:*", "courses:list"));
        assert!(!glob_matches("blogs:?", "blogs:12"));
        assert!(!glob_matches("blogs", "blogs:1"));
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("blogs:1", "hello").await.unwrap();

        let value: Option<String> = cache.get("blogs:1").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));

        let missing: Option<String> = cache.get("blogs:2").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_pattern_only_hits_prefix() {
        let cache = MemoryCache::new();
        cache.set("blogs:list", &vec!["a"]).await.unwrap();
        cache.set("blogs:get:1", "a").await.unwrap();
        cache.set("courses:list", &vec!["b"]).await.unwrap();

        cache.delete_pattern("blogs:*").await;

        assert!(cache.get::<Vec<String>>("blogs:list").await.unwrap().is_none());
        assert!(cache.get::<String>("blogs:get:1").await.unwrap().is_none());
        assert!(cache.get::<Vec<String>>("courses:list").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_fresh_skips_values_read_before_invalidation() {
        let cache = MemoryCache::new();

        let before_write = cache.generation();
        cache.delete_pattern("courses:*").await;
        let stored = cache
            .set_fresh("courses:list:all", &vec!["stale"], before_write)
            .await
            .unwrap();
        assert!(!stored);
        assert!(cache.get::<Vec<String>>("courses:list:all").await.unwrap().is_none());

        let current = cache.generation();
        assert!(cache.set_fresh("courses:list:all", &vec!["fresh"], current).await.unwrap());
        assert_eq!(
            cache.get::<Vec<String>>("courses:list:all").await.unwrap(),
            Some(vec!["fresh".to_string()])
        );
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = MemoryCache::with_capacity_and_ttl(100, Duration::from_millis(20));
        cache.set("k", "v").await.unwrap();
        assert!(cache.get::<String>("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.get::<String>("k").await.unwrap().is_none());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prefix_star_matches_any_suffix(prefix in "[a-z]{1,8}:", suffix in "[a-z0-9:]{0,12}") {
                let pattern = format!("{}*", prefix);
                let key = format!("{}{}", prefix, suffix);
                prop_assert!(glob_matches(&pattern, &key));
            }

            #[test]
            fn literal_pattern_matches_only_itself(a in "[a-z:]{1,12}", b in "[a-z:]{1,12}") {
                prop_assert_eq!(glob_matches(&a, &b), a == b);
            }
        }
    }
}
