//! Resolution handler: the composition root for ASN description lookups.
//!
//! Reads go override store, then cache, then the external resolver.
//! Override mutations go through [`OverrideService`], which purges the
//! shared cache before persisting.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::adapters::cache::{AsnCache, CacheStats};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Asn, AsnOverride};
use crate::domain::ports::{AsnResolver, OverrideRepository};
use crate::services::override_service::OverrideService;

/// Default deadline for one external resolution.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves ASN descriptions and manages overrides.
pub struct ResolutionHandler<R: OverrideRepository, S: AsnResolver> {
    overrides: OverrideService<R>,
    cache: Arc<AsnCache>,
    resolver: Arc<S>,
    resolve_timeout: Duration,
}

impl<R: OverrideRepository, S: AsnResolver> ResolutionHandler<R, S> {
    /// Wire a handler. Pass `None` as `repository` to run without
    /// override support.
    pub fn new(repository: Option<Arc<R>>, cache: Arc<AsnCache>, resolver: Arc<S>) -> Self {
        let overrides = OverrideService::new(repository, cache.clone());
        Self {
            overrides,
            cache,
            resolver,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Set the deadline applied to every external resolver call.
    #[must_use]
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// The override service this handler delegates to.
    pub const fn overrides(&self) -> &OverrideService<R> {
        &self.overrides
    }

    /// Occupancy of the shared cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve the description of an ASN.
    ///
    /// An override always wins. Otherwise a cached answer is returned, and
    /// on a miss the external resolver is asked and its answer cached.
    #[instrument(skip(self))]
    pub async fn resolve(&self, asn: &str) -> DomainResult<String> {
        let asn: Asn = asn.parse()?;
        // Taken before the store read so a concurrent Set/Remove voids our fill
        let ticket = self.cache.ticket(asn);

        match self.overrides.lookup_asn(asn).await {
            Ok(description) => {
                debug!(%asn, "override hit");
                return Ok(description);
            }
            Err(DomainError::NotFound(_) | DomainError::StoreUnavailable) => {}
            Err(e) => return Err(e),
        }

        if let Some(description) = self.cache.get(asn) {
            debug!(%asn, "cache hit");
            return Ok(description);
        }

        debug!(%asn, "cache miss, resolving upstream");
        let description = match tokio::time::timeout(self.resolve_timeout, self.resolver.resolve(asn)).await {
            Ok(Ok(description)) => description,
            Ok(Err(e)) => {
                warn!(%asn, error = %e, "external resolution failed");
                return Err(DomainError::infrastructure("resolve asn", asn, e));
            }
            Err(elapsed) => {
                warn!(%asn, timeout_ms = self.resolve_timeout.as_millis(), "external resolution timed out");
                return Err(DomainError::infrastructure("resolve asn", asn, elapsed));
            }
        };

        self.cache.put_if_fresh(ticket, &description);
        Ok(description)
    }

    /// See [`OverrideService::lookup`].
    pub async fn lookup_override(&self, asn: &str) -> DomainResult<String> {
        self.overrides.lookup(asn).await
    }

    /// See [`OverrideService::set`].
    pub async fn set_override(&self, asn: &str, description: &str) -> DomainResult<()> {
        self.overrides.set(asn, description).await
    }

    /// See [`OverrideService::remove`].
    pub async fn remove_override(&self, asn: &str) -> DomainResult<()> {
        self.overrides.remove(asn).await
    }

    /// See [`OverrideService::list`].
    pub async fn list_overrides(&self) -> DomainResult<Vec<AsnOverride>> {
        self.overrides.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOverrideRepository;
    use crate::adapters::resolvers::MockResolver;

    type TestHandler = ResolutionHandler<InMemoryOverrideRepository, MockResolver>;

    fn setup(resolver: MockResolver) -> (TestHandler, Arc<MockResolver>, Arc<InMemoryOverrideRepository>) {
        let repo = Arc::new(InMemoryOverrideRepository::new());
        let resolver = Arc::new(resolver);
        let handler = ResolutionHandler::new(
            Some(Arc::clone(&repo)),
            Arc::new(AsnCache::new()),
            Arc::clone(&resolver),
        );
        (handler, resolver, repo)
    }

    #[tokio::test]
    async fn test_miss_resolves_and_caches() {
        let (handler, resolver, _) = setup(MockResolver::new().with_answer(Asn::new(15169), "GOOGLE"));

        assert_eq!(handler.resolve("AS15169").await.unwrap(), "GOOGLE");
        assert_eq!(handler.resolve("AS15169").await.unwrap(), "GOOGLE");
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_override_wins_over_cache() {
        let (handler, resolver, _) = setup(MockResolver::new().with_answer(Asn::new(15169), "GOOGLE"));
        handler.resolve("AS15169").await.unwrap();

        handler.set_override("AS15169", "Search company").await.unwrap();
        assert_eq!(handler.resolve("AS15169").await.unwrap(), "Search company");
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_remove_falls_back_to_fresh_resolution() {
        let (handler, resolver, _) = setup(MockResolver::new().with_answer(Asn::new(1), "old"));
        handler.resolve("AS1").await.unwrap();
        handler.set_override("AS1", "local").await.unwrap();

        resolver.set_answer(Asn::new(1), "new");
        handler.remove_override("AS1").await.unwrap();

        assert_eq!(handler.resolve("AS1").await.unwrap(), "new");
        assert_eq!(resolver.calls(), 2);
    }

    #[tokio::test]
    async fn test_resolver_failure_is_infrastructure_and_not_cached() {
        let (handler, resolver, _) = setup(MockResolver::new().with_answer(Asn::new(1), "one"));
        resolver.set_failing(true);

        let err = handler.resolve("AS1").await.unwrap_err();
        assert!(err.is_infrastructure());

        resolver.set_failing(false);
        assert_eq!(handler.resolve("AS1").await.unwrap(), "one");
    }

    #[tokio::test]
    async fn test_resolver_timeout() {
        let (handler, _, _) = setup(
            MockResolver::new()
                .with_answer(Asn::new(1), "one")
                .with_latency(Duration::from_secs(5)),
        );
        let handler = handler.with_resolve_timeout(Duration::from_millis(20));

        let err = handler.resolve("AS1").await.unwrap_err();
        assert!(err.is_infrastructure());
        assert_eq!(handler.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_malformed_never_reaches_resolver() {
        let (handler, resolver, _) = setup(MockResolver::new());
        assert!(matches!(handler.resolve("google").await, Err(DomainError::MalformedIdentifier(_))));
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (handler, resolver, repo) = setup(MockResolver::new().with_answer(Asn::new(1), "one"));
        repo.set_unreachable(true);

        assert!(handler.resolve("AS1").await.unwrap_err().is_infrastructure());
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_without_override_store() {
        let resolver = Arc::new(MockResolver::new().with_answer(Asn::new(1), "one"));
        let handler: TestHandler = ResolutionHandler::new(None, Arc::new(AsnCache::new()), resolver);

        assert_eq!(handler.resolve("AS1").await.unwrap(), "one");
        assert!(matches!(handler.list_overrides().await, Err(DomainError::StoreUnavailable)));
    }
}
