//! Override persistence port.

use async_trait::async_trait;

use super::errors::StoreError;
use crate::domain::models::{Asn, AsnOverride};

/// Durable key/value mapping from ASN to operator description.
///
/// Implementations must be safe for concurrent use; the services share a
/// single instance across every caller.
#[async_trait]
pub trait OverrideRepository: Send + Sync {
    /// Get the override for an ASN
    ///
    /// # Returns
    /// * `Ok(Some(record))` if found
    /// * `Ok(None)` if no override exists
    /// * `Err(StoreError)` on query failure
    async fn get(&self, asn: Asn) -> Result<Option<AsnOverride>, StoreError>;

    /// Create or replace the override for `record.asn`
    async fn upsert(&self, record: &AsnOverride) -> Result<(), StoreError>;

    /// Delete the override for an ASN
    ///
    /// # Returns
    /// * `Ok(true)` if a record was removed
    /// * `Ok(false)` if there was nothing to remove
    async fn delete(&self, asn: Asn) -> Result<bool, StoreError>;

    /// List every override, ordered by AS number
    async fn list(&self) -> Result<Vec<AsnOverride>, StoreError>;
}
