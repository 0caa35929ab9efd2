//! External ASN metadata resolver port.

use async_trait::async_trait;

use super::errors::ResolverError;
use crate::domain::models::Asn;

/// Authoritative source of ASN descriptions outside this library.
#[async_trait]
pub trait AsnResolver: Send + Sync {
    /// Resolve the organisational description for an ASN.
    async fn resolve(&self, asn: Asn) -> Result<String, ResolverError>;
}
