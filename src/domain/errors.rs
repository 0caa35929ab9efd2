//! Domain errors for override management and ASN resolution.

use thiserror::Error;

use crate::domain::models::Asn;

/// Boxed underlying cause carried by [`DomainError::Infrastructure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failures callers can branch on.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Override persistence is not configured for this deployment.
    #[error("override store is not configured")]
    StoreUnavailable,

    /// No override exists for the identifier.
    #[error("no override for {0}")]
    NotFound(Asn),

    /// The identifier does not follow the `AS<number>` syntax.
    #[error("malformed ASN: {0:?}")]
    MalformedIdentifier(String),

    /// A dependency (store, resolver) failed.
    #[error("{operation} failed for {identifier}: {source}")]
    Infrastructure {
        /// What was being attempted.
        operation: &'static str,
        /// The ASN (or `*`) the operation concerned.
        identifier: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub(crate) fn infrastructure(
        operation: &'static str,
        identifier: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Infrastructure {
            operation,
            identifier: identifier.to_string(),
            source: source.into(),
        }
    }

    /// Whether the failure originated in a dependency rather than the caller.
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Infrastructure { .. })
    }
}

impl From<crate::domain::models::ParseAsnError> for DomainError {
    fn from(err: crate::domain::models::ParseAsnError) -> Self {
        Self::MalformedIdentifier(err.input)
    }
}
