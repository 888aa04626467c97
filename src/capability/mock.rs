//! Mock capability probe for deterministic testing
//!
//! A gated probe stays pending until its [`ProbeGate`] is resolved, which lets
//! tests order the probe result against other store activity.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{CapabilityProbe, ProbeError};

enum MockOutcome {
    Fixed(Result<bool, ProbeError>),
    Gated(Mutex<Option<oneshot::Receiver<Result<bool, ProbeError>>>>),
}

/// Capability probe returning a scripted result
#[derive(Clone)]
pub struct MockProbe {
    outcome: Arc<MockOutcome>,
    calls: Arc<AtomicUsize>,
}

/// Resolves a gated [`MockProbe`]
pub struct ProbeGate {
    tx: oneshot::Sender<Result<bool, ProbeError>>,
}

impl ProbeGate {
    /// Complete the pending probe. Returns false if nobody is waiting anymore.
    pub fn resolve(self, result: Result<bool, ProbeError>) -> bool {
        self.tx.send(result).is_ok()
    }
}

impl MockProbe {
    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome: Arc::new(outcome),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn resolving(available: bool) -> Self {
        Self::with_outcome(MockOutcome::Fixed(Ok(available)))
    }

    pub fn failing(error: ProbeError) -> Self {
        Self::with_outcome(MockOutcome::Fixed(Err(error)))
    }

    /// A probe that stays pending until the returned gate is resolved
    pub fn gated() -> (Self, ProbeGate) {
        let (tx, rx) = oneshot::channel();
        let probe = Self::with_outcome(MockOutcome::Gated(Mutex::new(Some(rx))));
        (probe, ProbeGate { tx })
    }

    /// Number of times the probe has been invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityProbe for MockProbe {
    fn name(&self) -> &str {
        "mock"
    }

    async fn platform_authenticator_available(&self) -> Result<bool, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.outcome.as_ref() {
            MockOutcome::Fixed(result) => result.clone(),
            MockOutcome::Gated(rx) => {
                let rx = rx.lock().take();
                match rx {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(ProbeError::Task("gate dropped".into()))),
                    None => Err(ProbeError::Unavailable("gated probe already consumed".into())),
                }
            }
        }
    }
}
