//! Errors raised by adapters behind the domain ports.

use thiserror::Error;

/// Override store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed a query.
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// A stored row does not decode into an override.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// The store could not be reached at all.
    #[error("Store unreachable: {0}")]
    Unreachable(String),
}

/// External resolver errors
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The DNS query itself failed.
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// The answer did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// The upstream knows nothing about the ASN.
    #[error("No data for the requested ASN")]
    NoData,

    /// The resolver refused to answer.
    #[error("Resolver unavailable: {0}")]
    Unavailable(String),
}
