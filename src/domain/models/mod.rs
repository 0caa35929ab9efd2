//! Domain models: identifiers, records and configuration.

pub mod asn;
pub mod asn_override;
pub mod config;

pub use asn::{Asn, ParseAsnError};
pub use asn_override::AsnOverride;
pub use config::{CacheConfig, Config, LoggingConfig, OverridesConfig, ResolverConfig};
