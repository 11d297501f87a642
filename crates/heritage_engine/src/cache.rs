//! Resolution caches shared by engine instances.
//!
//! Three memo tables back the engine:
//! - classes proven free of inner-class cycles, keyed by qualified name
//! - whether a tag type is a repeatable container, keyed by tag type
//! - the equivalent interface method of a public class method (bounded LRU)
//!
//! Every entry is a pure function of the declaration graph, so racing threads
//! may compute the same entry twice; insertion itself is atomic. Except for the
//! cycle-free set, keys are graph identifiers: share one `ResolutionCaches`
//! only between engines over the same graph.

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use heritage_foundation::{ClassId, MethodId};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::DEFAULT_INTERFACE_METHOD_CACHE_CAPACITY;

static GLOBAL: Lazy<Arc<ResolutionCaches>> = Lazy::new(|| Arc::new(ResolutionCaches::new()));

// =============================================================================
// Resolution Caches
// =============================================================================

/// The caches consulted during resolution.
#[derive(Debug)]
pub struct ResolutionCaches {
    cycle_free: DashSet<Arc<str>>,
    containers: DashMap<ClassId, bool>,
    interface_methods: Mutex<LruCache<MethodId, MethodId>>,
}

impl Default for ResolutionCaches {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCaches {
    /// Creates empty caches with the default interface-method capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INTERFACE_METHOD_CACHE_CAPACITY)
    }

    /// Creates empty caches with the given interface-method capacity.
    #[must_use]
    pub fn with_capacity(interface_method_capacity: usize) -> Self {
        Self {
            cycle_free: DashSet::new(),
            containers: DashMap::new(),
            interface_methods: Mutex::new(LruCache::new(interface_method_capacity)),
        }
    }

    /// Returns the lazily created process-wide instance.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Returns true if the class name was proven cycle-free.
    #[must_use]
    pub fn is_cycle_free(&self, class_name: &str) -> bool {
        self.cycle_free.contains(class_name)
    }

    /// Records a class name as cycle-free.
    pub fn mark_cycle_free(&self, class_name: &str) {
        if !self.cycle_free.contains(class_name) {
            self.cycle_free.insert(Arc::from(class_name));
        }
    }

    /// Returns the cached container check, computing it if absent.
    pub fn repeatable_container(&self, tag_type: ClassId, compute: impl FnOnce() -> bool) -> bool {
        if let Some(hit) = self.containers.get(&tag_type) {
            return *hit;
        }
        let value = compute();
        *self.containers.entry(tag_type).or_insert(value)
    }

    /// Returns the cached interface method, computing it if absent.
    pub fn interface_method(&self, method: MethodId, compute: impl FnOnce() -> MethodId) -> MethodId {
        if let Some(hit) = self.interface_methods.lock().get(&method) {
            return hit;
        }
        // Computed outside the lock; a concurrent duplicate computes the same value.
        let value = compute();
        self.interface_methods.lock().insert(method, value);
        value
    }

    /// Empties all caches.
    pub fn clear(&self) {
        self.cycle_free.clear();
        self.containers.clear();
        self.interface_methods.lock().clear();
        tracing::trace!("resolution caches cleared");
    }

    /// Returns current entry counts.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cycle_free_classes: self.cycle_free.len(),
            repeatable_containers: self.containers.len(),
            interface_methods: self.interface_methods.lock().len(),
        }
    }
}

/// Entry counts of [`ResolutionCaches`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Classes proven free of inner-class cycles.
    pub cycle_free_classes: usize,
    /// Tag types checked for being repeatable containers.
    pub repeatable_containers: usize,
    /// Cached equivalent interface methods.
    pub interface_methods: usize,
}

// =============================================================================
// LRU
// =============================================================================

/// A bounded map evicting the least recently used entry.
#[derive(Debug)]
struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: FxHashMap<K, (V, u64)>,
    recency: BTreeMap<u64, K>,
}

impl<K: Copy + Eq + Hash, V: Copy> LruCache<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: FxHashMap::default(),
            recency: BTreeMap::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let tick = self.next_tick();
        let (value, last) = self.entries.get_mut(key)?;
        self.recency.remove(&*last);
        *last = tick;
        self.recency.insert(tick, *key);
        Some(*value)
    }

    fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let tick = self.next_tick();
        if let Some((_, last)) = self.entries.insert(key, (value, tick)) {
            self.recency.remove(&last);
        }
        self.recency.insert(tick, key);
        while self.entries.len() > self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}
