use geoipdb::adapters::sqlite::{create_migrated_test_pool, initialize_database};
use sqlx::SqlitePool;
use std::path::Path;

/// Create an in-memory SQLite database for testing
///
/// Each call creates a completely isolated database instance with the
/// override schema applied.
pub async fn setup_test_db() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("failed to create test database")
}

/// Open (or create) an on-disk override database under `dir`.
pub async fn setup_file_db(dir: &Path) -> SqlitePool {
    let url = format!("sqlite:{}", dir.join("overrides.db").display());
    initialize_database(&url, None)
        .await
        .expect("failed to create file database")
}

/// Teardown test database
///
/// Closes the connection pool and cleans up resources.
pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}
