//! TTL-bounded result cache
//!
//! Key-value store with per-entry expiration and a hard capacity
//! bound. Expiry is lazy (enforced on read, no sweep task) and
//! eviction is oldest-insertion-first, not LRU: reads never refresh
//! an entry, so hit-rate optimality is traded for O(1) candidate
//! selection. Callers needing LRU must wrap this type.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys in insertion-stamp order, oldest first. Entries whose
    /// stamp no longer matches the map (refreshed or expired keys)
    /// are stale and skipped during eviction.
    insert_order: VecDeque<(K, Instant)>,
}

/// Capacity-bounded cache with per-entry TTL
///
/// All operations run under one lock per instance, so a lazy removal
/// on `get` is never observable as a half-expired entry.
pub struct TtlCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries, each valid
    /// for `ttl` after its last insertion
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity),
                insert_order: VecDeque::with_capacity(capacity),
            }),
            capacity,
            ttl,
        }
    }

    /// Look up `key`, removing it if its TTL has elapsed
    ///
    /// An entry exactly `ttl` old is treated as expired. This is the
    /// only place expiration is enforced.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        if let Some(entry) = state.entries.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // Expired: remove under the same lock as the read. Its
        // insert_order entry goes stale and is skipped later.
        state.entries.remove(key);
        None
    }

    /// Insert or update `key`
    ///
    /// Updating an existing key resets its TTL and its eviction
    /// priority to most-recent. A new key at capacity first evicts
    /// the oldest-inserted live entry.
    pub fn set(&self, key: K, value: V) {
        let now = Instant::now();
        let mut state = self.state.lock();

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            Self::evict_oldest(&mut state);
        }

        state.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        state.insert_order.push_back((key, now));
    }

    /// Remove all entries
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.insert_order.clear();
    }

    /// Current entry count, counting expired-but-unread entries
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Maximum entry count
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove the live entry with the smallest insertion stamp
    ///
    /// Pops stale order entries (stamp mismatch) until one matches
    /// the map; queue order makes the tie-break deterministic.
    fn evict_oldest(state: &mut CacheState<K, V>) {
        while let Some((key, stamp)) = state.insert_order.pop_front() {
            let live = matches!(
                state.entries.get(&key),
                Some(entry) if entry.inserted_at == stamp
            );
            if live {
                state.entries.remove(&key);
                return;
            }
        }
    }
}
