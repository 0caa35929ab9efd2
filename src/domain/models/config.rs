//! Configuration model loaded by the figment loader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for geoipdb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Override store configuration
    #[serde(default)]
    pub overrides: OverridesConfig,

    /// Resolution cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// External resolver configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Override store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OverridesConfig {
    /// Whether override persistence is available at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_true() -> bool {
    true
}

fn default_database_path() -> String {
    ".geoipdb/overrides.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            database_path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl OverridesConfig {
    /// The sqlx connection URL for the configured database path.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.database_path)
    }
}

/// Resolution cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Maximum number of cached descriptions
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Seconds a cached description stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

const fn default_max_capacity() -> u64 {
    10_000
}

const fn default_ttl_secs() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// External resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Deadline for a single external resolution, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    5000
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
