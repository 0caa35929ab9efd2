//! geoipdb - ASN resolution with cache-coherent local overrides
//!
//! Resolves autonomous system numbers (`AS15169`) to human readable
//! descriptions. Operators may pin a description with an override, which
//! always wins over the cached or externally resolved answer. A separate
//! classifier answers whether an IP address lies in non-globally-routable
//! space.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Identifier model, errors, ports, locality classifier
//! - **Service Layer** (`services`): Override management and the resolution handler
//! - **Adapters** (`adapters`): `SQLite` and in-memory stores, moka cache, DNS resolvers
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging and wiring
//!
//! # Example
//!
//! ```ignore
//! use geoipdb::{build_handler, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let handler = build_handler(&config).await?;
//!     handler.set_override("AS64500", "Example Transit").await?;
//!     println!("{}", handler.resolve("AS64500").await?);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::cache::{AsnCache, CacheStats};
pub use domain::locality::{is_local, LocalityClassifier, PrefixTableError};
pub use domain::models::{Asn, AsnOverride, Config, LoggingConfig, ParseAsnError};
pub use domain::ports::{AsnResolver, CacheInvalidator, OverrideRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{init_logging, LoggerGuard};
pub use infrastructure::{build_handler, DefaultHandler};
pub use services::{OverrideService, ResolutionHandler, DEFAULT_RESOLVE_TIMEOUT};
