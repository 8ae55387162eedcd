//! Memoization of compaction results.
//!
//! [`GeometryCache`] caches [`auto_arrange`] output keyed by a structural
//! fingerprint of the input layout and column count. Drag interactions tend
//! to re-stabilize the same layout several times per gesture (snap, optimize,
//! arrange, gap check), so the memo pays for itself quickly.
//!
//! The cache is owned by whoever drives the geometry — typically one
//! orchestrator instance — never shared process-wide, so two dashboards (or
//! two tests) can never observe each other's stale results.
//!
//! # Eviction
//!
//! Least-recently-used, bounded by the capacity given at construction.
//! [`invalidate_all`](GeometryCache::invalidate_all) drops every entry; use
//! it after anything that changes arrangement semantics out of band.

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

use crate::arrange::auto_arrange;
use crate::item::{Layout, LayoutItem};

/// Default entry capacity; a dashboard has a handful of breakpoints and a
/// dozen widgets, so a small cache is plenty.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// An LRU memo of compaction results, keyed by layout fingerprint.
#[derive(Debug, Clone)]
pub struct GeometryCache {
    capacity: usize,
    entries: FxHashMap<u64, CacheEntry>,
    tick: u64,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    layout: Layout,
    last_used: u64,
}

impl GeometryCache {
    /// Create a cache holding at most `capacity` arranged layouts.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: FxHashMap::default(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Compact a layout, reusing a cached result when the same layout and
    /// column count were arranged before.
    pub fn arrange(&mut self, layout: &[LayoutItem], cols: u32) -> Layout {
        let key = fingerprint(layout, cols);
        self.tick += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.tick;
            self.hits += 1;
            return entry.layout.clone();
        }
        self.misses += 1;
        let arranged = auto_arrange(layout, cols);
        self.insert(key, arranged.clone());
        arranged
    }

    fn insert(&mut self, key: u64, layout: Layout) {
        if self.entries.len() >= self.capacity {
            if let Some((&lru, _)) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
            {
                self.entries.remove(&lru);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                layout,
                last_used: self.tick,
            },
        );
    }

    /// Drop every cached entry. Counters are kept.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Cache hits since construction.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Cache misses since construction.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of cached layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Structural fingerprint of a layout plus column count.
///
/// Hashes every field that affects arrangement, so two layouts collide only
/// on a genuine 64-bit hash collision, not on a modeling gap.
#[must_use]
pub fn fingerprint(layout: &[LayoutItem], cols: u32) -> u64 {
    let mut hasher = FxHasher::default();
    cols.hash(&mut hasher);
    layout.len().hash(&mut hasher);
    for item in layout {
        item.id.hash(&mut hasher);
        item.x.to_bits().hash(&mut hasher);
        item.y.to_bits().hash(&mut hasher);
        item.w.to_bits().hash(&mut hasher);
        item.h.to_bits().hash(&mut hasher);
        item.min_w.map(f64::to_bits).hash(&mut hasher);
        item.min_h.map(f64::to_bits).hash(&mut hasher);
        item.max_w.map(f64::to_bits).hash(&mut hasher);
        item.max_h.map(f64::to_bits).hash(&mut hasher);
        item.is_static.hash(&mut hasher);
    }
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
