// SPDX-License-Identifier: MPL-2.0
//! Decoded image cache shared between the orchestrator and background workers.
//!
//! # Design
//!
//! - **Name-keyed**: entries are indexed by file name, not full path
//! - **First insert wins**: a second insert for a present key is rejected and
//!   the rejected image is handed back to the caller
//! - **Reservations**: an entry with a non-zero reservation count survives
//!   [`CacheGuard::trim_to`] and [`CacheGuard::clear`]
//! - **Scoped locking**: every primitive is reached through a [`CacheGuard`],
//!   so a multi-step sequence (reserve, mutate, release) is atomic with
//!   respect to other threads and the lock is released on every exit path
//!
//! # Usage
//!
//! ```
//! use lens_browse::cache::ImageCache;
//! use std::collections::HashSet;
//!
//! let cache = ImageCache::new();
//! let mut guard = cache.lock();
//! assert!(!guard.contains("a.png"));
//! guard.trim_to(&HashSet::new());
//! ```

use crate::media::Image;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cached image plus its reservation count.
#[derive(Debug)]
struct CacheEntry {
    image: Arc<Image>,
    reservations: u32,
}

/// Statistics about cache behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found an entry.
    pub hits: u64,

    /// Number of lookups that found nothing.
    pub misses: u64,

    /// Number of successful inserts.
    pub insertions: u64,

    /// Number of inserts rejected because the key was already present.
    pub rejected_inserts: u64,

    /// Number of entries evicted by trim or clear.
    pub evictions: u64,
}

impl CacheStats {
    /// Returns the cache hit rate as a percentage (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Concurrent store of decoded images.
#[derive(Debug, Default)]
pub struct ImageCache {
    inner: Mutex<CacheInner>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the cache lock for the lifetime of the returned guard.
    ///
    /// May block briefly while another thread holds the guard.
    pub fn lock(&self) -> CacheGuard<'_> {
        CacheGuard {
            inner: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// Exclusive access to the cache; dropping it unlocks.
pub struct CacheGuard<'a> {
    inner: MutexGuard<'a, CacheInner>,
}

impl CacheGuard<'_> {
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.entries.contains_key(key)
    }

    /// Returns a shared handle to the cached image, if present.
    pub fn get(&mut self, key: &str) -> Option<Arc<Image>> {
        let found = self.inner.entries.get(key).map(|entry| entry.image.clone());
        if found.is_some() {
            self.inner.stats.hits += 1;
        } else {
            self.inner.stats.misses += 1;
        }
        found
    }

    /// Takes ownership of `image` if `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns the image back if `key` is already present; the caller should
    /// discard it and [`get`](Self::get) the surviving entry instead.
    pub fn insert(&mut self, key: impl Into<String>, image: Image) -> Result<Arc<Image>, Image> {
        let key = key.into();
        if self.inner.entries.contains_key(&key) {
            self.inner.stats.rejected_inserts += 1;
            return Err(image);
        }
        let image = Arc::new(image);
        self.inner.entries.insert(
            key,
            CacheEntry {
                image: image.clone(),
                reservations: 0,
            },
        );
        self.inner.stats.insertions += 1;
        Ok(image)
    }

    /// Pins `key` against eviction. Fails (and creates nothing) if absent.
    pub fn reserve(&mut self, key: &str) -> bool {
        match self.inner.entries.get_mut(key) {
            Some(entry) => {
                entry.reservations += 1;
                true
            }
            None => false,
        }
    }

    /// Undoes one successful [`reserve`](Self::reserve).
    pub fn release(&mut self, key: &str) {
        match self.inner.entries.get_mut(key) {
            Some(entry) if entry.reservations > 0 => entry.reservations -= 1,
            _ => tracing::warn!(key, "cache release without matching reservation"),
        }
    }

    /// Current reservation count of `key` (0 when absent).
    #[must_use]
    pub fn reservations(&self, key: &str) -> u32 {
        self.inner
            .entries
            .get(key)
            .map_or(0, |entry| entry.reservations)
    }

    /// Runs `f` on the entry while it is reserved, releasing afterwards.
    ///
    /// Returns `None` without calling `f` if the reservation fails.
    pub fn with_reserved<R>(&mut self, key: &str, f: impl FnOnce(&Arc<Image>) -> R) -> Option<R> {
        if !self.reserve(key) {
            return None;
        }
        let image = self.inner.entries.get(key).map(|entry| entry.image.clone());
        let result = image.as_ref().map(f);
        self.release(key);
        result
    }

    /// Evicts every unreserved entry whose key is not in `keep`.
    pub fn trim_to(&mut self, keep: &HashSet<String>) {
        self.evict_where(|key, _| !keep.contains(key));
    }

    /// Evicts every unreserved entry.
    pub fn clear(&mut self) {
        self.evict_where(|_, _| true);
    }

    fn evict_where(&mut self, mut should_evict: impl FnMut(&str, &CacheEntry) -> bool) {
        let before = self.inner.entries.len();
        self.inner
            .entries
            .retain(|key, entry| entry.reservations > 0 || !should_evict(key, entry));
        let evicted = before - self.inner.entries.len();
        self.inner.stats.evictions += evicted as u64;
    }

    /// Keys currently cached, in no particular order.
    #[must_use]
    pub fn keys(&self) -> HashSet<String> {
        self.inner.entries.keys().cloned().collect()
    }

    /// Returns `true` if any entry is currently reserved.
    #[must_use]
    pub fn has_reservations(&self) -> bool {
        self.inner
            .entries
            .values()
            .any(|entry| entry.reservations > 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.stats
    }
}
