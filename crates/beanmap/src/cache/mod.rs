// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent LRU cache for type descriptors.
//!
//! The [`MetadataCache`] ensures structural resolution runs once per
//! distinct [`Type`] in the common case. Hits are served under a read lock
//! from an in-memory LRU cache. Misses resolve outside any lock; two threads
//! missing on the same type may both resolve it, and both then return the
//! descriptor stored first. A secondary dashmap keeps track of "pinned"
//! types that must never be evicted.

use crate::descriptor::TypeDescriptor;
use crate::resolver::Resolve;
use crate::types::Type;
use dashmap::DashSet;
use lru::LruCache;
use parking_lot::RwLock;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Default number of cached descriptors.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub last_miss_ns: u64,
}

/// LRU-based concurrent cache for type descriptors.
pub struct MetadataCache {
    inner: RwLock<LruCache<Type, Arc<TypeDescriptor>>>,
    pinned: DashSet<Type>,
    stats: RwLock<LookupStats>,
}

impl MetadataCache {
    /// Cache holding at most `capacity` descriptors (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
            pinned: DashSet::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Cached descriptor for `ty`, resolving it with `resolver` on a miss.
    pub fn get_or_resolve(&self, ty: &Type, resolver: &dyn Resolve) -> Arc<TypeDescriptor> {
        if let Some(hit) = self.try_peek(ty) {
            self.record_hit();
            return hit;
        }

        let start = Instant::now();
        let resolved = resolver.resolve(ty);
        log::debug!("[cache] miss for {}", ty);

        let mut cache = self.inner.write();
        if let Some(raced) = cache.get(ty) {
            // Another thread stored this type while we were resolving.
            let stored = Arc::clone(raced);
            drop(cache);
            self.record_miss(start);
            return stored;
        }

        if cache.len() >= cache.cap().get() && !self.free_slot(&mut cache) {
            drop(cache);
            log::debug!("[cache] full of pinned entries, not storing {}", ty);
            self.record_miss(start);
            return resolved;
        }

        cache.put(ty.clone(), Arc::clone(&resolved));
        drop(cache);
        self.record_miss(start);
        resolved
    }

    /// Cached descriptor, without resolving. Marks the entry as recently used.
    pub fn get(&self, ty: &Type) -> Option<Arc<TypeDescriptor>> {
        self.inner.write().get(ty).map(Arc::clone)
    }

    /// Never evict `ty`.
    pub fn pin(&self, ty: Type) {
        self.pinned.insert(ty);
    }

    /// Make `ty` evictable again.
    pub fn unpin(&self, ty: &Type) -> bool {
        self.pinned.remove(ty).is_some()
    }

    pub fn is_pinned(&self, ty: &Type) -> bool {
        self.pinned.contains(ty)
    }

    /// Drop the cached descriptor of `ty`, pinned or not.
    pub fn invalidate(&self, ty: &Type) -> bool {
        self.inner.write().pop(ty).is_some()
    }

    /// Drop every cached descriptor. Pins are kept.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().cap().get()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn try_peek(&self, ty: &Type) -> Option<Arc<TypeDescriptor>> {
        let cache = self.inner.read();
        cache.peek(ty).map(Arc::clone)
    }

    fn free_slot(&self, cache: &mut LruCache<Type, Arc<TypeDescriptor>>) -> bool {
        if cache.len() < cache.cap().get() {
            return true;
        }

        let attempts = cache.len();
        for _ in 0..attempts {
            if let Some((old_key, old_value)) = cache.pop_lru() {
                if self.pinned.contains(&old_key) {
                    cache.put(old_key, old_value);
                } else {
                    self.stats.write().evictions += 1;
                    return true;
                }
            } else {
                break;
            }
        }

        false
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("pinned", &self.pinned.len())
            .field("stats", &self.stats())
            .finish()
    }
}

/// A resolver memoized through a [`MetadataCache`].
#[derive(Clone)]
pub struct CachedResolver {
    inner: Arc<dyn Resolve>,
    cache: Arc<MetadataCache>,
}

impl CachedResolver {
    pub fn new(inner: Arc<dyn Resolve>, cache: Arc<MetadataCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// The uncached resolver.
    pub fn inner(&self) -> &Arc<dyn Resolve> {
        &self.inner
    }
}

impl Resolve for CachedResolver {
    fn resolve(&self, ty: &Type) -> Arc<TypeDescriptor> {
        self.cache.get_or_resolve(ty, self.inner.as_ref())
    }
}

impl fmt::Debug for CachedResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
