//! In-process serialization of decisions per employee.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on first use and dropped again once
/// nobody holds or waits for it.
#[derive(Debug)]
pub struct KeyedLocks<K: Eq + Hash> {
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    /// Waits for exclusive access to `key`. Released when the guard drops.
    pub async fn lock(&self, key: &K) -> KeyGuard<'_, K> {
        let mutex = self.locks.entry(key.clone()).or_default().clone();
        KeyGuard {
            locks: &self.locks,
            key: key.clone(),
            guard: Some(mutex.lock_owned().await),
        }
    }
}

/// Exclusive access to one key of a [`KeyedLocks`].
pub struct KeyGuard<'a, K: Eq + Hash> {
    locks: &'a DashMap<K, Arc<Mutex<()>>>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash> Drop for KeyGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The map's own reference is the last one: no holder, no waiter.
        self.locks.remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
