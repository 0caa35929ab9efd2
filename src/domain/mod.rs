//! Domain layer for geoipdb
//!
//! Identifier model, error taxonomy, port traits and the locality
//! classifier. Nothing here performs I/O.

pub mod errors;
pub mod locality;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
