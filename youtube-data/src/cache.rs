//! In-memory memoization of resolved IDs and fetched resources.

use crate::kind::{ListEndpoint, ResourceKind};
use crate::resource::Resource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A value memoized by the kernel.
#[derive(Debug, Clone)]
pub enum Cached {
    /// The outcome of resolving free-form input to an ID.
    Id(String),
    /// A single fetched resource.
    Item(Resource),
    /// One complete paginated listing.
    Items(Vec<Resource>),
}

#[derive(Debug)]
struct Entry {
    value: Cached,
    stored_at: Instant,
}

/// Key/value store shared by the resolver, the item fetcher and the paginator.
///
/// Writes are last-writer-wins per key; entries are never merged. With no TTL configured,
/// entries live as long as the cache does.
///
/// With a TTL, an expired entry is dropped when its key is next read, and every
/// [`PURGE_INTERVAL`]th store sweeps all expired entries. Owners that want memory back sooner
/// can call [`Cache::purge_expired`] themselves.
#[derive(Debug)]
pub struct Cache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Option<Duration>,
    enabled: bool,
    stores: AtomicUsize,
}

/// Number of stores between sweeps of expired entries.
pub const PURGE_INTERVAL: usize = 64;

impl Default for Cache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Cache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            enabled: true,
            stores: AtomicUsize::new(0),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(None)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(entry.stored_at) >= ttl)
    }

    pub async fn get(&self, key: &str) -> Option<Cached> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    tracing::trace!(key, "cache miss");
                    return None;
                }
                Some(entry) if !self.is_expired(entry, now) => {
                    tracing::trace!(key, "cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock; another task may have refreshed the entry meanwhile.
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            tracing::trace!(key, "cache entry expired");
            entries.remove(key);
        }
        None
    }

    pub async fn set(&self, key: impl Into<String>, value: Cached) {
        if !self.enabled {
            return;
        }
        let key = key.into();
        tracing::trace!(key = %key, "cache store");

        let now = Instant::now();
        let sweep = self.ttl.is_some()
            && (self.stores.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_INTERVAL == 0;

        let mut entries = self.entries.write().await;
        if sweep {
            let before = entries.len();
            entries.retain(|_, entry| !self.is_expired(entry, now));
            tracing::trace!(purged = before - entries.len(), "swept expired cache entries");
        }
        entries.insert(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    /// Drops every entry whose TTL has elapsed.
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .retain(|_, entry| !self.is_expired(entry, now));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Builders for the keys the kernel stores under.
pub(crate) mod key {
    use super::*;

    /// `get_id://{endpoint}/{input}`
    pub(crate) fn resolved_id(kind: ResourceKind, input: &str) -> String {
        format!("get_id://{}/{}", kind.endpoint(), input)
    }

    /// `get://{endpoint}/{id or mine}`
    pub(crate) fn item(kind: ResourceKind, id: Option<&str>) -> String {
        format!("get://{}/{}", kind.endpoint(), id.unwrap_or("mine"))
    }

    /// `get://{endpoint}/{id or mine}/{max_results}`
    pub(crate) fn listing(endpoint: ListEndpoint, id: Option<&str>, max_results: i64) -> String {
        format!(
            "get://{}/{}/{}",
            endpoint.name(),
            id.unwrap_or("mine"),
            max_results
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(value: &str) -> Cached {
        Cached::Id(value.to_string())
    }

    fn as_id(cached: Option<Cached>) -> Option<String> {
        match cached {
            Some(Cached::Id(id)) => Some(id),
            _ => None,
        }
    }

    #[tokio::test]
    async fn last_write_wins() {
        let cache = Cache::default();
        cache.set("k", id("first")).await;
        cache.set("k", id("second")).await;
        assert_eq!(as_id(cache.get("k").await).as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache = Cache::disabled();
        cache.set("k", id("v")).await;
        assert!(cache.get("k").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = Cache::new(Some(Duration::from_secs(60)));
        cache.set("k", id("v")).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(as_id(cache.get("k").await).as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("k").await.is_none());
        assert!(cache.is_empty().await, "expired entry should be dropped on read");
    }

    #[tokio::test(start_paused = true)]
    async fn purge_only_drops_expired_entries() {
        let cache = Cache::new(Some(Duration::from_secs(10)));
        cache.set("old", id("1")).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("new", id("2")).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        cache.purge_expired().await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("new").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn no_ttl_means_no_expiry() {
        let cache = Cache::new(None);
        cache.set("k", id("v")).await;
        tokio::time::advance(Duration::from_secs(60 * 60 * 24 * 365)).await;
        assert!(cache.get("k").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn stores_periodically_sweep_expired_entries() {
        let cache = Cache::new(Some(Duration::from_secs(10)));
        cache.set("stale", id("never read again")).await;
        tokio::time::advance(Duration::from_secs(11)).await;

        for i in 1..PURGE_INTERVAL - 1 {
            cache.set(format!("fresh{i}"), id("v")).await;
        }
        assert_eq!(cache.len().await, PURGE_INTERVAL - 1, "no sweep yet");

        cache.set("last", id("v")).await;
        assert_eq!(cache.len().await, PURGE_INTERVAL - 1);
        assert!(cache.get("stale").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_and_writers() {
        let cache = Arc::new(Cache::default());

        let tasks: Vec<_> = (0..32)
            .map(|task| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    for i in 0..100 {
                        let key = format!("key{}", i % 10);
                        cache.set(key.clone(), id(&format!("{task}:{i}"))).await;
                        let value = as_id(cache.get(&key).await);
                        assert!(value.is_some_and(|v| v.contains(':')), "torn entry for {key}");
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cache.len().await, 10);
        for i in 0..10 {
            assert!(cache.get(&format!("key{i}")).await.is_some());
        }
    }

    #[test]
    fn listing_keys_include_the_requested_maximum() {
        let a = key::listing(ListEndpoint::PlaylistItems, Some("PL1"), 5);
        let b = key::listing(ListEndpoint::PlaylistItems, Some("PL1"), -1);
        assert_eq!(a, "get://playlistItems/PL1/5");
        assert_ne!(a, b);
        assert_eq!(key::item(ResourceKind::Channel, None), "get://channels/mine");
        assert_eq!(
            key::resolved_id(ResourceKind::Video, "rick astley"),
            "get_id://videos/rick astley"
        );
    }
}
