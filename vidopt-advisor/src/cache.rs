//! Feature cache keyed by frame content.
//!
//! Extraction stays a pure function; this cache only memoizes its output.
//! Entries are keyed by [`FrameDigest`], so two frames with the same size and
//! samples share one entry. When full, the least recently used entry goes.

use crate::features::FeatureVector;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;
use vidopt_core::FrameDigest;

#[derive(Debug, Clone)]
struct CacheEntry {
    features: FeatureVector,
    last_used: u64,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Capacity-bounded LRU cache of feature vectors.
#[derive(Debug)]
pub struct FeatureCache {
    capacity: usize,
    entries: HashMap<FrameDigest, CacheEntry>,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for FeatureCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl FeatureCache {
    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            clock: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up a digest, marking the entry as recently used.
    pub fn get(&mut self, digest: &FrameDigest) -> Option<FeatureVector> {
        let now = self.tick();
        match self.entries.get_mut(digest) {
            Some(entry) => {
                entry.last_used = now;
                self.hits += 1;
                Some(entry.features)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up without touching recency or counters.
    pub fn peek(&self, digest: &FrameDigest) -> Option<&FeatureVector> {
        self.entries.get(digest).map(|e| &e.features)
    }

    /// Insert or refresh an entry, evicting the least recently used one when full.
    pub fn insert(&mut self, digest: FrameDigest, features: FeatureVector) {
        let now = self.tick();
        if let Some(entry) = self.entries.get_mut(&digest) {
            entry.features = features;
            entry.last_used = now;
            return;
        }

        while self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.entries.insert(
            digest,
            CacheEntry {
                features,
                last_used: now,
            },
        );
    }

    /// Return the cached vector for `digest`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, digest: FrameDigest, compute: F) -> FeatureVector
    where
        F: FnOnce() -> FeatureVector,
    {
        if let Some(features) = self.get(&digest) {
            return features;
        }
        let features = compute();
        self.insert(digest, features);
        features
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(k, _)| *k);

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!("Evicted cached features for frame {}", key);
        }
    }

    /// Check whether a digest is cached.
    pub fn contains(&self, digest: &FrameDigest) -> bool {
        self.entries.contains_key(digest)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}
