//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Bootstrap wiring of the production resolution handler

pub mod bootstrap;
pub mod config;
pub mod logging;

pub use bootstrap::{build_handler, DefaultHandler};
