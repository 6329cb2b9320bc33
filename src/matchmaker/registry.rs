//! Capacity-bounded key/value registry with least-recently-used eviction
//!
//! Lookups and inserts both count as a use. Inserting into a full registry
//! drops the entry that was used longest ago and hands it back to the caller.
//! The lock is held only for the map operation itself; values are cloned out
//! (typically an `Arc`) so callers work on them without blocking the registry.

use crate::error::{GameResult, MatchmakingError};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct RegistryInner<K, V> {
    entries: HashMap<K, (V, u64)>,
    /// Last-use tick -> key, oldest first
    recency: BTreeMap<u64, K>,
    tick: u64,
}

impl<K: Eq + Hash + Clone, V> RegistryInner<K, V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn touch(&mut self, key: &K) {
        let tick = self.next_tick();
        if let Some((_, last_used)) = self.entries.get_mut(key) {
            let previous = std::mem::replace(last_used, tick);
            self.recency.remove(&previous);
            self.recency.insert(tick, key.clone());
        }
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key).map(|(value, _)| (key, value))
    }
}

/// A bounded map that forgets its least recently used entries
#[derive(Debug)]
pub struct BoundedRegistry<K, V> {
    inner: Mutex<RegistryInner<K, V>>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedRegistry<K, V> {
    /// Create a registry holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(RegistryInner {
                entries: HashMap::with_capacity(capacity),
                recency: BTreeMap::new(),
                tick: 0,
            }),
            capacity,
        }
    }

    fn lock(&self) -> GameResult<MutexGuard<'_, RegistryInner<K, V>>> {
        self.inner
            .lock()
            .map_err(|_| MatchmakingError::lock_poisoned("registry"))
    }

    /// Look up a value, marking it as recently used
    pub fn get(&self, key: &K) -> GameResult<Option<V>> {
        let mut inner = self.lock()?;
        let value = inner.entries.get(key).map(|(value, _)| value.clone());
        if value.is_some() {
            inner.touch(key);
        }
        Ok(value)
    }

    /// Check for a key without affecting its recency
    pub fn contains(&self, key: &K) -> GameResult<bool> {
        Ok(self.lock()?.entries.contains_key(key))
    }

    /// Insert or replace a value, returning whatever had to be evicted
    pub fn insert(&self, key: K, value: V) -> GameResult<Vec<(K, V)>> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let mut evicted = Vec::new();

        if inner.entries.contains_key(&key) {
            let tick = inner.next_tick();
            if let Some((slot, last_used)) = inner.entries.get_mut(&key) {
                *slot = value;
                let previous = std::mem::replace(last_used, tick);
                inner.recency.remove(&previous);
                inner.recency.insert(tick, key);
            }
            return Ok(evicted);
        }

        while inner.entries.len() >= self.capacity {
            match inner.evict_oldest() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }

        let tick = inner.next_tick();
        inner.recency.insert(tick, key.clone());
        inner.entries.insert(key, (value, tick));

        Ok(evicted)
    }

    /// Number of live entries
    pub fn len(&self) -> GameResult<usize> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> GameResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
