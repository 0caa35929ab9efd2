//! Wiring of a production [`ResolutionHandler`] from [`Config`].

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::adapters::cache::AsnCache;
use crate::adapters::resolvers::CymruResolver;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteOverrideRepository};
use crate::domain::models::Config;
use crate::services::ResolutionHandler;

/// The handler `build_handler` produces.
pub type DefaultHandler = ResolutionHandler<SqliteOverrideRepository, CymruResolver>;

/// Build a handler backed by `SQLite` overrides and Team Cymru lookups.
///
/// With `overrides.enabled = false` no database is opened and every
/// override operation reports `StoreUnavailable`.
pub async fn build_handler(config: &Config) -> Result<DefaultHandler> {
    let repository = if config.overrides.enabled {
        let pool = initialize_database(
            &config.overrides.database_url(),
            Some(PoolConfig::from(&config.overrides)),
        )
        .await
        .context("Failed to initialize override store")?;
        Some(Arc::new(SqliteOverrideRepository::new(pool)))
    } else {
        info!("override store disabled");
        None
    };

    let cache = Arc::new(AsnCache::from_config(&config.cache));
    let resolver = Arc::new(CymruResolver::new());

    Ok(ResolutionHandler::new(repository, cache, resolver)
        .with_resolve_timeout(Duration::from_millis(config.resolver.timeout_ms)))
}
