//! Layout stabilizers the exporter may wait on before measuring the capture source.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Font loading failed: {0}")]
pub struct ReadinessError(pub String);

/// Reports when the fonts used by a capture source have finished loading.
///
/// Waiting is best-effort for the exporter: errors are logged and the export proceeds. The
/// returned future may be dropped at any point, which abandons the wait without side effects.
#[async_trait]
pub trait FontReadiness: Send + Sync + Debug {
    /// Resolves once fonts are loaded or loading has failed.
    async fn wait_until_ready(&self) -> Result<(), ReadinessError>;
}

#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Pending,
    Loaded,
    Failed(String),
}

/// A one-shot latch a host flips once its font loading settles.
#[derive(Debug)]
pub struct FontLoadLatch {
    state: watch::Sender<LoadState>,
}

impl Default for FontLoadLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoadLatch {
    pub fn new() -> Self {
        Self { state: watch::Sender::new(LoadState::Pending) }
    }

    /// A latch that is already released.
    pub fn loaded() -> Self {
        Self { state: watch::Sender::new(LoadState::Loaded) }
    }

    pub fn mark_loaded(&self) {
        self.settle(LoadState::Loaded);
    }

    pub fn mark_failed(&self, message: impl Into<String>) {
        self.settle(LoadState::Failed(message.into()));
    }

    pub fn is_settled(&self) -> bool {
        *self.state.borrow() != LoadState::Pending
    }

    // First outcome wins.
    fn settle(&self, new_state: LoadState) {
        self.state.send_if_modified(|state| {
            if *state == LoadState::Pending {
                *state = new_state;
                true
            } else {
                false
            }
        });
    }
}

#[async_trait]
impl FontReadiness for FontLoadLatch {
    async fn wait_until_ready(&self) -> Result<(), ReadinessError> {
        let mut settled = self.state.subscribe();
        let outcome = settled
            .wait_for(|state| *state != LoadState::Pending)
            .await
            .map(|state| state.clone())
            .map_err(|_| ReadinessError("font load latch closed".to_string()))?;
        match outcome {
            LoadState::Failed(message) => Err(ReadinessError(message)),
            _ => Ok(()),
        }
    }
}
