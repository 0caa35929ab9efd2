//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters must implement:
//! - OverrideRepository: durable override persistence
//! - CacheInvalidator: point invalidation of cached descriptions
//! - AsnResolver: external ASN metadata lookups
//!
//! These traits keep the services independent of specific storage,
//! cache and network implementations.

pub mod asn_resolver;
pub mod cache_invalidator;
pub mod errors;
pub mod override_repository;

pub use asn_resolver::AsnResolver;
pub use cache_invalidator::CacheInvalidator;
pub use errors::{ResolverError, StoreError};
pub use override_repository::OverrideRepository;
