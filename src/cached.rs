//! Cached searcher with hot reload support.
//!
//! Wraps a [`Searcher`] behind a mutex and an LRU cache of query results,
//! so one engine can serve many threads and repeated lookups skip the
//! index walk entirely. The database can be swapped at runtime without
//! dropping in-flight callers.

use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use quick_cache::sync::Cache;

use crate::error::Result;
use crate::version::Version;
use crate::xdb::Searcher;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

fn hash_query(text: &str) -> u64 {
    let mut hasher = ahash::AHasher::default();
    text.trim().hash(&mut hasher);
    hasher.finish()
}

/// Configuration for the cached searcher.
#[derive(Debug, Clone)]
pub struct CachedSearcherConfig {
    /// Maximum number of entries in the cache.
    pub cache_capacity: usize,
    /// Whether to enable caching.
    pub cache_enabled: bool,
}

impl Default for CachedSearcherConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_enabled: true,
        }
    }
}

impl CachedSearcherConfig {
    /// Create a configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            cache_enabled: true,
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            cache_capacity: 0,
            cache_enabled: false,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
}

/// Thread-safe, LRU-cached region searcher.
///
/// Only successful results are cached, hits and empty misses alike; both
/// are stable properties of the database generation. Errors always
/// propagate uncached.
///
/// # Example
///
/// ```ignore
/// use ipregion::{CachedSearcher, Version};
///
/// let searcher = CachedSearcher::open(Version::V4, "ip2region_v4.xdb")?;
/// let region = searcher.search("61.142.118.231")?;
///
/// // Swap in a freshly downloaded database without downtime.
/// searcher.reload("ip2region_v4.new.xdb")?;
/// ```
pub struct CachedSearcher {
    inner: Mutex<Searcher>,
    cache: Option<Cache<u64, Arc<[u8]>>>,
    config: CachedSearcherConfig,
    /// Incremented on each reload.
    generation: AtomicU64,
}

impl CachedSearcher {
    /// Open a file-backed cached searcher with default configuration.
    pub fn open<P: AsRef<Path>>(version: Version, path: P) -> Result<Self> {
        Self::open_with_config(version, path, CachedSearcherConfig::default())
    }

    /// Open a file-backed cached searcher with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        version: Version,
        path: P,
        config: CachedSearcherConfig,
    ) -> Result<Self> {
        Ok(Self::build(Searcher::open(version, path)?, config))
    }

    /// Create from full database content with default configuration.
    pub fn from_buffer(version: Version, content: Vec<u8>) -> Result<Self> {
        Self::from_buffer_with_config(version, content, CachedSearcherConfig::default())
    }

    /// Create from full database content with custom configuration.
    pub fn from_buffer_with_config(
        version: Version,
        content: Vec<u8>,
        config: CachedSearcherConfig,
    ) -> Result<Self> {
        Ok(Self::build(
            Searcher::open_with_buffer(version, content)?,
            config,
        ))
    }

    fn build(searcher: Searcher, config: CachedSearcherConfig) -> Self {
        let cache = if config.cache_enabled && config.cache_capacity > 0 {
            Some(Cache::new(config.cache_capacity))
        } else {
            None
        };
        Self {
            inner: Mutex::new(searcher),
            cache,
            config,
            generation: AtomicU64::new(0),
        }
    }

    /// Look up the region payload for an IP address, consulting the cache
    /// first. An empty payload means no range contains the address.
    pub fn search(&self, text: &str) -> Result<Arc<[u8]>> {
        let key = hash_query(text);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                return Ok(hit);
            }
        }

        let payload: Arc<[u8]> = self.inner.lock().search(text)?.into();

        if let Some(cache) = &self.cache {
            cache.insert(key, payload.clone());
        }

        Ok(payload)
    }

    /// Hot reload the database from a new file.
    ///
    /// Atomically replaces the engine and clears the cache; callers racing
    /// the swap finish against whichever generation they started on.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let version = self.inner.lock().version();
        let fresh = Searcher::open(version, path.as_ref())?;
        self.swap(fresh);
        log::info!("hot reloaded region database from {:?}", path.as_ref());
        Ok(())
    }

    /// Hot reload the database from full content bytes.
    pub fn reload_from_buffer(&self, content: Vec<u8>) -> Result<()> {
        let version = self.inner.lock().version();
        let fresh = Searcher::open_with_buffer(version, content)?;
        self.swap(fresh);
        log::info!("hot reloaded region database from buffer");
        Ok(())
    }

    fn swap(&self, fresh: Searcher) {
        *self.inner.lock() = fresh;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// I/O operations issued by the most recent uncached query.
    pub fn io_count(&self) -> u32 {
        self.inner.lock().io_count()
    }

    /// The engine's IP version.
    pub fn version(&self) -> Version {
        self.inner.lock().version()
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            Some(cache) => CacheStats {
                capacity: self.config.cache_capacity,
                len: cache.len(),
                enabled: true,
            },
            None => CacheStats {
                capacity: 0,
                len: 0,
                enabled: false,
            },
        }
    }

    /// The current generation (incremented on each reload).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Close the underlying engine and drop cached results.
    pub fn close(&self) {
        self.inner.lock().close();
        self.clear_cache();
    }
}
