//! Caption cache using moka
//!
//! Concurrent, cost-bounded map from resource key to caption text.

use moka::future::Cache;
use std::future::Future;

/// Cost-bounded caption cache
///
/// Each entry costs the byte length of its key plus its caption. Entries
/// never expire by time; once the total cost passes the budget, the least
/// useful entries are evicted.
#[derive(Debug, Clone)]
pub struct CaptionCache {
    inner: Cache<String, String>,
    max_cost: u64,
}

impl CaptionCache {
    /// Create a cache with a cost budget in bytes
    #[must_use]
    pub fn new(max_cost: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_cost)
                .weigher(|key: &String, caption: &String| -> u32 {
                    u32::try_from(key.len() + caption.len()).unwrap_or(u32::MAX)
                })
                .build(),
            max_cost,
        }
    }

    /// Look up a caption
    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    /// Store a caption, replacing any previous one
    pub async fn insert(&self, key: impl Into<String>, caption: impl Into<String>) {
        self.inner.insert(key.into(), caption.into()).await;
    }

    /// Return the cached caption or compute and store it
    ///
    /// No lock is held while `f` runs, so concurrent misses for one key may
    /// each compute; the last write wins. Errors are returned uncached.
    pub async fn try_get_or_insert_with<E, F, Fut>(&self, key: &str, f: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(cached) = self.get(key).await {
            return Ok(cached);
        }

        let caption = f().await?;
        self.insert(key, caption.clone()).await;
        Ok(caption)
    }

    /// Drop one entry
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Cost budget in bytes
    pub fn max_cost(&self) -> u64 {
        self.max_cost
    }

    /// Approximate number of entries
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending maintenance so counts are exact
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}
