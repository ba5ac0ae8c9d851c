use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Delays re-triggering a fetch while free-text search input is still
/// changing. One logical channel: arming a new timer aborts the pending
/// one, so only the final keystroke's timer fires.
#[derive(Debug, Default)]
pub struct DebounceScheduler {
    pending: Mutex<Option<AbortHandle>>,
}

impl DebounceScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Arms a timer that runs `action` after `delay`, cancelling any
    /// previously armed timer first.
    pub fn schedule<F>(&self, runtime: &Handle, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        *pending = Some(task.abort_handle());
    }

    /// Clears any pending timer. Must be called at teardown so the
    /// timer cannot fire after the owner is gone.
    pub fn cancel(&self) {
        if let Some(pending) = self.lock_pending().take() {
            pending.abort();
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
