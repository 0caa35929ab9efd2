//! Hierarchical configuration loading and validation.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown `logging.level`.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown `logging.rotation`.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    /// Overrides enabled without a database path.
    #[error("Database path cannot be empty when overrides are enabled")]
    EmptyDatabasePath,

    /// Zero pool connections.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// Zero cache capacity.
    #[error("Invalid cache max_capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    /// Zero cache TTL.
    #[error("Invalid cache ttl_secs: {0}. Must be at least 1")]
    InvalidCacheTtl(u64),

    /// Zero resolver timeout.
    #[error("Invalid resolver timeout_ms: {0}. Must be at least 1")]
    InvalidResolverTimeout(u64),
}

/// Accepted `logging.level` values.
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];
const VALID_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .geoipdb/config.yaml (project config)
    /// 3. .geoipdb/local.yaml (local overrides, optional)
    /// 4. Environment variables (GEOIPDB_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".geoipdb/config.yaml"))
            .merge(Yaml::file(".geoipdb/local.yaml"))
            .merge(Env::prefixed("GEOIPDB_").split("__"))
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("GEOIPDB_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.overrides.enabled {
            if config.overrides.database_path.is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }
            if config.overrides.max_connections == 0 {
                return Err(ConfigError::InvalidMaxConnections(config.overrides.max_connections));
            }
        }

        if config.cache.max_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.max_capacity));
        }
        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidCacheTtl(config.cache.ttl_secs));
        }

        if config.resolver.timeout_ms == 0 {
            return Err(ConfigError::InvalidResolverTimeout(config.resolver.timeout_ms));
        }

        if !VALID_LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if !VALID_LOG_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if !VALID_ROTATIONS.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.overrides.enabled);
        assert_eq!(config.overrides.database_path, ".geoipdb/overrides.db");
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.resolver.timeout_ms, 5000);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
overrides:
  enabled: false
cache:
  max_capacity: 50
  ttl_secs: 60
resolver:
  timeout_ms: 250
logging:
  level: debug
  format: pretty
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert!(!config.overrides.enabled);
        assert_eq!(config.overrides.database_path, ".geoipdb/overrides.db");
        assert_eq!(config.cache.max_capacity, 50);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.resolver.timeout_ms, 250);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.rotation, "daily");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.overrides.database_path = String::new();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::EmptyDatabasePath)));

        // Irrelevant when overrides are disabled
        config.overrides.enabled = false;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut config = Config::default();
        config.overrides.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_cache_limits() {
        let mut config = Config::default();
        config.cache.max_capacity = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidCacheCapacity(0))
        ));

        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidCacheTtl(0))));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.resolver.timeout_ms = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidResolverTimeout(0))
        ));
    }

    #[test]
    fn test_validate_logging() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidLogFormat(_))));

        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidLogRotation(_))));
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(base_file, "cache:\n  max_capacity: 5\n  ttl_secs: 30\nlogging:\n  level: info").unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "cache:\n  max_capacity: 15").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.cache.max_capacity, 15, "Override should win");
        assert_eq!(config.cache.ttl_secs, 30, "Base value should persist when not overridden");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "resolver:\n  timeout_ms: 1000").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("GEOIPDB_RESOLVER__TIMEOUT_MS", Some("2500")),
                ("GEOIPDB_OVERRIDES__ENABLED", Some("false")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.resolver.timeout_ms, 2500);
                assert!(!config.overrides.enabled);
            },
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cache:\n  ttl_secs: 0").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }
}
