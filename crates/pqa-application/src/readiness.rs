//! Readiness signal for stores that load in the background.

use tokio::task::JoinHandle;

/// Resolves once a store's initial load has finished.
///
/// Load failures are handled inside the task (logged, state left at its
/// defaults), so waiting never fails. Dropping the handle does not cancel the
/// load.
#[derive(Debug)]
pub struct Readiness {
    handle: JoinHandle<()>,
}

impl Readiness {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Waits for the initial load.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("[Readiness] Store load task did not complete: {}", e);
        }
    }

    /// True once the load has finished, without waiting.
    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }
}
