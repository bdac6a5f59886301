//! Pluggable cross-call fetch cache
//!
//! The resolver's in-call deduplication is mandatory and always on; this
//! cache is the optional layer above it for callers that resolve the
//! same objects repeatedly. It is an explicit capability passed to the
//! resolver - never ambient global state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::plan::{FetchKey, Fetched};

/// Cache of store-call results keyed by fetch identity
#[async_trait]
pub trait FetchCache: Send + Sync {
    /// Look up a previously stored result
    async fn lookup(&self, key: &FetchKey) -> Option<Fetched>;

    /// Store a fresh result
    async fn store(&self, key: &FetchKey, value: &Fetched);
}

/// Cached fetch result with its refresh time
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Fetched,
    stored_at: Instant,
}

/// In-memory TTL cache
pub struct MemoryFetchCache {
    ttl: Duration,
    entries: RwLock<HashMap<FetchKey, CacheEntry>>,
}

impl MemoryFetchCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop all entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl FetchCache for MemoryFetchCache {
    async fn lookup(&self, key: &FetchKey) -> Option<Fetched> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn store(&self, key: &FetchKey, value: &Fetched) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.clone(),
            CacheEntry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
    }
}
