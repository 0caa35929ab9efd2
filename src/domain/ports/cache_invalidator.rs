//! Cache invalidation port.

use crate::domain::models::Asn;

/// Point invalidation of cached data for one identifier.
///
/// Purging a key that is not cached is a no-op. After `purge_key` returns,
/// no resolution that started before the call may repopulate the key.
pub trait CacheInvalidator: Send + Sync {
    /// Drop any cached entry for `asn`.
    fn purge_key(&self, asn: Asn);
}
