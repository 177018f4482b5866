use std::{
    collections::VecDeque,
    hash::Hash,
    time::{Duration, Instant},
};

use rustc_hash::FxHashMap;

// ------------------------------------------------------------------------------------------------
// --- BoundedCache
// ------------------------------------------------------------------------------------------------

/// Insertion-ordered memo cache. When it has grown past `capacity`, the oldest
/// key is evicted before the next insert, so it holds at most `capacity + 1` entries.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: FxHashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FxHashMap::default(),
            order: VecDeque::new(),
        }
    }

    // Getters/Setters

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // Functions

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.len() > self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.entries.remove(&oldest);
        }

        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
    }

    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }
}

// ------------------------------------------------------------------------------------------------
// --- TimedCell
// ------------------------------------------------------------------------------------------------

/// A single cached value that goes stale after `ttl`.
#[derive(Debug)]
pub struct TimedCell<T> {
    ttl: Duration,
    value: Option<(Instant, T)>,
}

impl<T: Clone> TimedCell<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, value: None }
    }

    pub fn get(&self) -> Option<T> {
        self.value
            .as_ref()
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn set(&mut self, value: T) {
        self.value = Some((Instant::now(), value));
    }

    pub fn get_or_refresh(&mut self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get() {
            return value;
        }
        let value = compute();
        self.set(value.clone());
        value
    }
}
