//! Mock resolver for testing.
//!
//! Answers from a fixed table, counts calls, and can inject latency,
//! failures, or hold every call until released.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

use crate::domain::models::Asn;
use crate::domain::ports::{AsnResolver, ResolverError};

/// Scriptable in-process resolver.
#[derive(Default)]
pub struct MockResolver {
    answers: Mutex<HashMap<Asn, String>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    latency: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
    entered: Notify,
}

impl MockResolver {
    /// Create a resolver with no canned answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned answer.
    pub fn with_answer(self, asn: Asn, description: impl Into<String>) -> Self {
        self.set_answer(asn, description);
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Block every call until [`release`](Self::release) hands out a permit.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Replace the canned answer for `asn`.
    pub fn set_answer(&self, asn: Asn, description: impl Into<String>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(asn, description.into());
    }

    /// Make subsequent calls fail with `ResolverError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Let `calls` gated calls proceed.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    /// Wait until a call has entered the resolver.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AsnResolver for MockResolver {
    async fn resolve(&self, asn: Asn) -> Result<String, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ResolverError::Unavailable(e.to_string()))?
                .forget();
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ResolverError::Unavailable("mock resolver failing".to_string()));
        }

        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&asn)
            .cloned()
            .ok_or(ResolverError::NoData)
    }
}
