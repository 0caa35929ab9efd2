//! Override service: validated, cache-coherent override persistence.
//!
//! Every mutation purges the cache key before it touches the store, so a
//! crash between the two steps leaves at worst a cache miss, never a stale
//! hit. Validation runs before either step.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Asn, AsnOverride};
use crate::domain::ports::{CacheInvalidator, OverrideRepository};

/// Override management over a repository and a cache invalidator.
pub struct OverrideService<R: OverrideRepository> {
    repository: Option<Arc<R>>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl<R: OverrideRepository> OverrideService<R> {
    /// `repository` is optional: without one every operation reports
    /// `StoreUnavailable`.
    pub fn new(repository: Option<Arc<R>>, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        Self {
            repository,
            invalidator,
        }
    }

    /// Whether a repository was supplied.
    pub const fn is_configured(&self) -> bool {
        self.repository.is_some()
    }

    fn repository(&self) -> DomainResult<&R> {
        self.repository.as_deref().ok_or(DomainError::StoreUnavailable)
    }

    /// Description override for `asn`, or `NotFound`.
    #[instrument(skip(self))]
    pub async fn lookup(&self, asn: &str) -> DomainResult<String> {
        self.lookup_asn(asn.parse()?).await
    }

    pub(crate) async fn lookup_asn(&self, asn: Asn) -> DomainResult<String> {
        let repository = self.repository()?;
        let record = repository
            .get(asn)
            .await
            .map_err(|e| infrastructure("lookup override", asn, e))?;

        record.map(|r| r.description).ok_or(DomainError::NotFound(asn))
    }

    /// Store or replace the description for `asn`.
    #[instrument(skip(self, description))]
    pub async fn set(&self, asn: &str, description: &str) -> DomainResult<()> {
        let asn: Asn = asn.parse()?;

        self.invalidator.purge_key(asn);
        let repository = self.repository()?;
        repository
            .upsert(&AsnOverride::new(asn, description))
            .await
            .map_err(|e| infrastructure("set override", asn, e))?;

        info!(%asn, "override set");
        Ok(())
    }

    /// Remove the override for `asn`. Removing a missing override succeeds.
    #[instrument(skip(self))]
    pub async fn remove(&self, asn: &str) -> DomainResult<()> {
        let asn: Asn = asn.parse()?;

        self.invalidator.purge_key(asn);
        let repository = self.repository()?;
        let removed = repository
            .delete(asn)
            .await
            .map_err(|e| infrastructure("remove override", asn, e))?;

        info!(%asn, removed, "override removed");
        Ok(())
    }

    /// Every override, ordered by AS number. Empty when there are none.
    #[instrument(skip(self))]
    pub async fn list(&self) -> DomainResult<Vec<AsnOverride>> {
        self.repository()?
            .list()
            .await
            .map_err(|e| infrastructure("list overrides", "*", e))
    }
}

fn infrastructure(
    operation: &'static str,
    identifier: impl ToString,
    source: crate::domain::ports::StoreError,
) -> DomainError {
    let err = DomainError::infrastructure(operation, identifier, source);
    warn!(error = %err, "override store failure");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::AsnCache;
    use crate::adapters::memory::InMemoryOverrideRepository;
    use std::sync::Mutex;

    /// Records purged keys instead of caching anything.
    #[derive(Default)]
    struct RecordingInvalidator {
        purged: Mutex<Vec<Asn>>,
    }

    impl CacheInvalidator for RecordingInvalidator {
        fn purge_key(&self, asn: Asn) {
            self.purged.lock().unwrap().push(asn);
        }
    }

    fn setup() -> (
        OverrideService<InMemoryOverrideRepository>,
        Arc<InMemoryOverrideRepository>,
        Arc<RecordingInvalidator>,
    ) {
        let repo = Arc::new(InMemoryOverrideRepository::new());
        let invalidator = Arc::new(RecordingInvalidator::default());
        let service = OverrideService::new(Some(Arc::clone(&repo)), invalidator.clone());
        (service, repo, invalidator)
    }

    #[tokio::test]
    async fn test_set_then_lookup() {
        let (service, _, _) = setup();
        service.set("AS64500", "Example Transit").await.unwrap();
        assert_eq!(service.lookup("AS64500").await.unwrap(), "Example Transit");
    }

    #[tokio::test]
    async fn test_set_purges_before_persisting() {
        let (service, _, invalidator) = setup();
        service.set("AS64500", "x").await.unwrap();
        assert_eq!(*invalidator.purged.lock().unwrap(), vec![Asn::new(64500)]);
    }

    #[tokio::test]
    async fn test_set_malformed_has_no_side_effects() {
        let (service, _, invalidator) = setup();

        let err = service.set("64500", "x").await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedIdentifier(ref s) if s == "64500"));
        assert!(invalidator.purged.lock().unwrap().is_empty());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_missing_is_not_found() {
        let (service, _, _) = setup();
        let err = service.lookup("AS1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(asn) if asn == Asn::new(1)));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (service, _, invalidator) = setup();
        service.remove("AS1").await.unwrap();

        service.set("AS1", "one").await.unwrap();
        service.remove("AS1").await.unwrap();
        service.remove("AS1").await.unwrap();

        assert!(matches!(service.lookup("AS1").await, Err(DomainError::NotFound(_))));
        assert_eq!(invalidator.purged.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unconfigured_store() {
        let cache = Arc::new(AsnCache::new());
        let service: OverrideService<InMemoryOverrideRepository> = OverrideService::new(None, cache);

        assert!(!service.is_configured());
        assert!(matches!(service.lookup("AS1").await, Err(DomainError::StoreUnavailable)));
        assert!(matches!(service.set("AS1", "x").await, Err(DomainError::StoreUnavailable)));
        assert!(matches!(service.remove("AS1").await, Err(DomainError::StoreUnavailable)));
        assert!(matches!(service.list().await, Err(DomainError::StoreUnavailable)));
    }

    #[tokio::test]
    async fn test_store_failure_is_infrastructure_after_purge() {
        let (service, repo, invalidator) = setup();
        repo.set_unreachable(true);

        let err = service.set("AS7", "seven").await.unwrap_err();
        assert!(err.is_infrastructure());
        assert!(err.to_string().contains("AS7"));
        assert_eq!(*invalidator.purged.lock().unwrap(), vec![Asn::new(7)]);

        assert!(service.list().await.unwrap_err().is_infrastructure());
    }
}
