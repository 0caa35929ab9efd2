//! In-memory OverrideRepository.
//!
//! Holds overrides in a `BTreeMap` so listing is naturally ordered. Useful
//! for tests and for deployments that want overrides without durability.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::models::{Asn, AsnOverride};
use crate::domain::ports::{OverrideRepository, StoreError};

/// Non-durable override store.
#[derive(Debug, Default)]
pub struct InMemoryOverrideRepository {
    records: RwLock<BTreeMap<Asn, String>>,
    unreachable: AtomicBool,
}

impl InMemoryOverrideRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StoreError::Unreachable`
    /// until cleared. Simulates a transport outage.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Unreachable("in-memory store marked unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OverrideRepository for InMemoryOverrideRepository {
    async fn get(&self, asn: Asn) -> Result<Option<AsnOverride>, StoreError> {
        self.check_reachable()?;
        let records = self.records.read().await;
        Ok(records.get(&asn).map(|d| AsnOverride::new(asn, d.clone())))
    }

    async fn upsert(&self, record: &AsnOverride) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut records = self.records.write().await;
        records.insert(record.asn, record.description.clone());
        Ok(())
    }

    async fn delete(&self, asn: Asn) -> Result<bool, StoreError> {
        self.check_reachable()?;
        let mut records = self.records.write().await;
        Ok(records.remove(&asn).is_some())
    }

    async fn list(&self) -> Result<Vec<AsnOverride>, StoreError> {
        self.check_reachable()?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|(asn, d)| AsnOverride::new(*asn, d.clone()))
            .collect())
    }
}
