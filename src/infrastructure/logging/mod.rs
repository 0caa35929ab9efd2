//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with optional
//! rolling JSON files via tracing-appender.

pub mod logger;

pub use logger::{LogFormat, LoggerGuard, RotationPolicy, init_logging};
