//! ASN description cache using moka.
//!
//! Memoizes external resolver answers keyed by ASN, bounded in size and
//! time-to-live. Fills are guarded by a global purge sequence: a resolution
//! takes a [`FillTicket`] before it consults upstream, and its answer is
//! only stored if no purge of that key happened in between.

use moka::sync::Cache;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::models::{Asn, CacheConfig};
use crate::domain::ports::CacheInvalidator;

/// Default maximum number of cached descriptions.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Default TTL for cached descriptions.
const DEFAULT_TTL_SECS: u64 = 3600;

/// Purge bookkeeping shared by the cache and its outstanding tickets.
///
/// Purges are only remembered while a ticket that predates them is alive,
/// so `purged` is bounded by the purges issued during in-flight resolutions.
#[derive(Debug, Default)]
struct Coherence {
    /// Bumped by every purge and clear.
    seq: u64,
    /// Sequence of the last `clear`.
    cleared_at: u64,
    /// Sequence of the last purge per key, for keys purged after the oldest live ticket.
    purged: HashMap<Asn, u64>,
    /// Live ticket count per ticket sequence.
    live: BTreeMap<u64, usize>,
}

impl Coherence {
    fn is_stale(&self, asn: Asn, seq: u64) -> bool {
        self.cleared_at > seq || self.purged.get(&asn).is_some_and(|&purged| purged > seq)
    }

    fn release(&mut self, seq: u64) {
        if let Some(count) = self.live.get_mut(&seq) {
            *count -= 1;
            if *count == 0 {
                self.live.remove(&seq);
            }
        }
        match self.live.keys().next() {
            None => self.purged.clear(),
            // Only a live ticket older than the purge can be rejected by it
            Some(&oldest) => self.purged.retain(|_, purged| *purged > oldest),
        }
    }
}

fn lock(coherence: &Mutex<Coherence>) -> MutexGuard<'_, Coherence> {
    // Plain counters; a panic cannot leave them torn
    coherence.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Proof of the cache state observed when a resolution started.
///
/// Dropping the ticket without filling releases it.
#[derive(Debug)]
pub struct FillTicket {
    asn: Asn,
    seq: u64,
    coherence: Arc<Mutex<Coherence>>,
}

impl FillTicket {
    /// The key this ticket may fill.
    pub const fn asn(&self) -> Asn {
        self.asn
    }
}

impl Drop for FillTicket {
    fn drop(&mut self) {
        lock(&self.coherence).release(self.seq);
    }
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Entries currently cached.
    pub entries: u64,
    /// Configured upper bound on entries.
    pub max_capacity: u64,
}

/// Thread-safe cache of resolved ASN descriptions.
pub struct AsnCache {
    entries: Cache<Asn, Arc<str>>,
    coherence: Arc<Mutex<Coherence>>,
    max_capacity: u64,
}

impl AsnCache {
    /// Create a cache with default capacity and TTL.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_CAPACITY, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Create with custom capacity and TTL.
    pub fn with_limits(max_capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            coherence: Arc::new(Mutex::new(Coherence::default())),
            max_capacity,
        }
    }

    /// Create from the `cache` section of the configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_limits(config.max_capacity, Duration::from_secs(config.ttl_secs))
    }

    /// Look up a cached description. A miss means "unknown", never "absent".
    pub fn get(&self, asn: Asn) -> Option<String> {
        self.entries.get(&asn).map(|d| d.to_string())
    }

    /// Record the current state of `asn` before resolving it upstream.
    pub fn ticket(&self, asn: Asn) -> FillTicket {
        let mut coherence = lock(&self.coherence);
        let seq = coherence.seq;
        *coherence.live.entry(seq).or_insert(0) += 1;
        FillTicket {
            asn,
            seq,
            coherence: Arc::clone(&self.coherence),
        }
    }

    /// Store a description resolved under `ticket`.
    ///
    /// Returns `false`, storing nothing, if the key was purged (or the cache
    /// cleared) since the ticket was taken.
    pub fn put_if_fresh(&self, ticket: FillTicket, description: &str) -> bool {
        let stored = {
            let coherence = lock(&self.coherence);
            if coherence.is_stale(ticket.asn, ticket.seq) {
                tracing::debug!(asn = %ticket.asn, "discarding fill that raced a purge");
                false
            } else {
                self.entries.insert(ticket.asn, Arc::from(description));
                true
            }
        };
        // Releasing takes the lock again
        drop(ticket);
        stored
    }

    /// Store a description unconditionally.
    pub fn put(&self, asn: Asn, description: &str) {
        let _coherence = lock(&self.coherence);
        self.entries.insert(asn, Arc::from(description));
    }

    /// Drop every entry and invalidate every outstanding ticket.
    pub fn clear(&self) {
        let mut coherence = lock(&self.coherence);
        coherence.seq += 1;
        coherence.cleared_at = coherence.seq;
        coherence.purged.clear();
        self.entries.invalidate_all();
    }

    /// Current occupancy, after applying pending evictions.
    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats {
            entries: self.entries.entry_count(),
            max_capacity: self.max_capacity,
        }
    }
}

impl Default for AsnCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheInvalidator for AsnCache {
    fn purge_key(&self, asn: Asn) {
        let mut coherence = lock(&self.coherence);
        coherence.seq += 1;
        // With no ticket in flight there is no fill left to reject
        if !coherence.live.is_empty() {
            let seq = coherence.seq;
            coherence.purged.insert(asn, seq);
        }
        self.entries.invalidate(&asn);
        tracing::debug!(%asn, "cache key purged");
    }
}
