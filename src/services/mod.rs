//! Services coordinating the domain ports.

pub mod override_service;
pub mod resolution_handler;

pub use override_service::OverrideService;
pub use resolution_handler::{ResolutionHandler, DEFAULT_RESOLVE_TIMEOUT};
