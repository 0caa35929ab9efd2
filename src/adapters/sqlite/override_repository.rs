//! SQLite implementation of the OverrideRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::models::{Asn, AsnOverride};
use crate::domain::ports::{OverrideRepository, StoreError};

/// `SQLite` backed override store.
#[derive(Clone)]
pub struct SqliteOverrideRepository {
    pool: SqlitePool,
}

impl SqliteOverrideRepository {
    /// Use a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OverrideRepository for SqliteOverrideRepository {
    async fn get(&self, asn: Asn) -> Result<Option<AsnOverride>, StoreError> {
        let row: Option<OverrideRow> = sqlx::query_as(
            "SELECT asn, description FROM asn_overrides WHERE asn = ?"
        )
        .bind(asn.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, record: &AsnOverride) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO asn_overrides (asn, description) VALUES (?, ?)
               ON CONFLICT(asn) DO UPDATE SET description = excluded.description"#
        )
        .bind(record.asn.to_string())
        .bind(&record.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, asn: Asn) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM asn_overrides WHERE asn = ?")
            .bind(asn.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<AsnOverride>, StoreError> {
        let rows: Vec<OverrideRow> = sqlx::query_as("SELECT asn, description FROM asn_overrides")
            .fetch_all(&self.pool)
            .await?;

        let mut records = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<AsnOverride>, _>>()?;
        // Text keys sort lexically; AS numbers sort numerically
        records.sort_by_key(|r| r.asn);
        Ok(records)
    }
}

#[derive(sqlx::FromRow)]
struct OverrideRow {
    asn: String,
    description: String,
}

impl TryFrom<OverrideRow> for AsnOverride {
    type Error = StoreError;

    fn try_from(row: OverrideRow) -> Result<Self, Self::Error> {
        let asn = row
            .asn
            .parse::<Asn>()
            .map_err(|e| StoreError::CorruptRecord(e.to_string()))?;

        Ok(Self {
            asn,
            description: row.description,
        })
    }
}
