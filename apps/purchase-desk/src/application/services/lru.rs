//! Bounded least-recently-used cache.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::num::NonZeroUsize;

#[derive(Debug)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

/// Fixed-capacity map that evicts the least recently used entry on insert.
///
/// Not synchronized; wrap in a mutex to share.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    slots: HashMap<K, Slot<V>>,
    // stamp -> key, oldest first
    recency: BTreeMap<u64, K>,
    clock: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            slots: HashMap::with_capacity(capacity.get()),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Look up a value, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let stamp = self.tick();
        let slot = self.slots.get_mut(key)?;
        self.recency.remove(&slot.stamp);
        slot.stamp = stamp;
        self.recency.insert(stamp, key.clone());
        Some(slot.value.clone())
    }

    /// Look up a value without touching its recency.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Insert or replace a value. Returns the evicted entry, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let stamp = self.tick();

        if let Some(slot) = self.slots.get_mut(&key) {
            self.recency.remove(&slot.stamp);
            slot.stamp = stamp;
            slot.value = value;
            self.recency.insert(stamp, key);
            return None;
        }

        let evicted = if self.slots.len() >= self.capacity.get() {
            self.evict_oldest()
        } else {
            None
        };

        self.recency.insert(stamp, key.clone());
        self.slots.insert(key, Slot { value, stamp });
        evicted
    }

    /// Remove a key.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.slots.remove(key)?;
        self.recency.remove(&slot.stamp);
        Some(slot.value)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.recency.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let slot = self.slots.remove(&key)?;
        Some((key, slot.value))
    }
}
