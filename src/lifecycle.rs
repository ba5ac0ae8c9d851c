use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the owning screen instance is still mounted.
///
/// Network completions can resolve after the consumer has navigated
/// away; every state mutation checks `is_active()` first and becomes a
/// no-op once the guard is deactivated.
#[derive(Debug)]
pub struct LifecycleGuard {
    active: AtomicBool,
}

impl LifecycleGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Deactivates the guard. Returns true on the first call, false on
    /// any subsequent one, so teardown work runs exactly once.
    pub fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self::new()
    }
}
