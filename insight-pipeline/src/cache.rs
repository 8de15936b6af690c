//! Time-bounded cache for upstream query results.
//!
//! Report renders hit the same upstream tables over and over; a short TTL
//! keeps repeated renders cheap while bounding staleness. The clock is
//! injected so tests can advance time without sleeping, and the cache is an
//! explicit object owned by the data-access side; the forecaster and
//! classifier never see it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Millisecond time source.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall-clock time. The production clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Read-through cache with per-entry expiry.
///
/// Staleness up to the TTL is an accepted freshness tradeoff, not a
/// correctness concern; expired entries are simply recomputed.
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, (u64, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    fn is_fresh(&self, stored_at: u64) -> bool {
        let now = self.clock.now_millis();
        now.saturating_sub(stored_at) < self.ttl.as_millis() as u64
    }

    /// Fresh value for `key`, if any. Expired entries read as absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|(stored_at, _)| self.is_fresh(*stored_at))
            .map(|(_, value)| value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, (self.clock.now_millis(), value));
    }

    /// Return the fresh cached value or compute, store, and return it.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let now = self.clock.now_millis();
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if now.saturating_sub(occupied.get().0) >= self.ttl.as_millis() as u64 {
                    log::debug!("cache entry stale, recomputing");
                    occupied.insert((now, compute()));
                }
                &occupied.into_mut().1
            }
            Entry::Vacant(vacant) => {
                log::debug!("cache miss, computing entry");
                &vacant.insert((now, compute())).1
            }
        }
    }

    /// Like [`TtlCache::get_or_insert_with`], but the compute step can
    /// fail. A failed recompute leaves the cache unchanged, so the next
    /// read retries instead of serving a poisoned entry.
    pub fn try_get_or_insert_with<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        let now = self.clock.now_millis();
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if now.saturating_sub(occupied.get().0) >= self.ttl.as_millis() as u64 {
                    log::debug!("cache entry stale, recomputing");
                    occupied.insert((now, compute()?));
                }
                Ok(&occupied.into_mut().1)
            }
            Entry::Vacant(vacant) => {
                log::debug!("cache miss, computing entry");
                Ok(&vacant.insert((now, compute()?)).1)
            }
        }
    }

    /// Drop expired entries. Optional housekeeping; `get` already treats
    /// them as absent.
    pub fn evict_expired(&mut self) {
        let now = self.clock.now_millis();
        let ttl = self.ttl.as_millis() as u64;
        self.entries
            .retain(|_, (stored_at, _)| now.saturating_sub(*stored_at) < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
