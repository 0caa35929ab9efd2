//! In-memory caching layer for resolved ASN descriptions.
//!
//! Uses `moka` for bounded, TTL-based concurrent caching with point
//! invalidation driven by override mutations.

pub mod asn_cache;

pub use asn_cache::{AsnCache, CacheStats, FillTicket};
