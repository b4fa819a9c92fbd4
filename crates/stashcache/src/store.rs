//! LocalStore: bounded in-process backing store

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use stashline::{async_trait, Getter, Result, Setter};
use tracing::trace;

use crate::config::LocalConfig;
use crate::lru::LruCache;
use crate::stats::CacheStats;

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process LRU store with optional per-entry expiry
///
/// Expired entries are dropped lazily when read, or in bulk by
/// [`purge_expired`](LocalStore::purge_expired).
pub struct LocalStore<V> {
    entries: RwLock<LruCache<String, Entry<V>>>,
    stats: CacheStats,
    ttl: Option<Duration>,
}

impl<V: Clone> LocalStore<V> {
    /// Create a store from a config
    pub fn new(config: LocalConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity)),
            stats: CacheStats::new(),
            ttl: config.ttl,
        }
    }

    /// Create a store holding `capacity` entries without expiry
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(LocalConfig::new().with_capacity(capacity))
    }

    /// Look up a key, dropping it if it has expired
    pub fn lookup(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.write();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => {
                entries.remove(key);
                self.stats.record_expirations(1);
                trace!(key, "local entry expired");
            }
            None => {}
        }

        self.stats.record_miss();
        None
    }

    /// Store a value with the configured ttl
    pub fn insert(&self, key: &str, value: V) {
        self.insert_with_ttl(key, value, self.ttl);
    }

    /// Store a value with an explicit ttl, `None` keeps it until evicted
    pub fn insert_with_ttl(&self, key: &str, value: V, ttl: Option<Duration>) {
        let entry = Entry {
            value,
            // a deadline past what Instant can represent means no expiry
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        };

        let evicted = self.entries.write().put(key.to_owned(), entry);
        self.stats.record_insert();
        if let Some((victim, _)) = evicted {
            self.stats.record_eviction();
            trace!(key = %victim, "local entry evicted");
        }
    }

    /// True when a live entry exists, without touching recency or stats
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remove a key, returning its value if it was still live
    pub fn remove(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entry = self.entries.write().remove(key)?;
        (!entry.is_expired(now)).then_some(entry.value)
    }

    /// Drop every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let purged = self.entries.write().retain(|_, entry| !entry.is_expired(now));
        self.stats.record_expirations(purged as u64);
        purged
    }

    /// Get store statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of entries, expired ones included until they are dropped
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.entries.read().capacity()
    }

    /// Ttl applied by `set`
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.entries.write().clear();
        self.stats.reset();
    }
}

impl<V: Clone> Default for LocalStore<V> {
    fn default() -> Self {
        Self::new(LocalConfig::default())
    }
}

#[async_trait]
impl<V> Getter<V> for LocalStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.lookup(key))
    }
}

#[async_trait]
impl<V> Setter<V> for LocalStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: V) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}
