use std::sync::atomic::{AtomicBool, Ordering};

/// Decides whether regaining screen focus should trigger a refetch.
///
/// The very first focus event coincides with the mount-time fetch and
/// is skipped; once the initial fetch has settled (success or failure),
/// every later focus event refetches so that changes made on a
/// create/edit sub-screen show up without a manual pull-to-refresh.
#[derive(Debug, Default)]
pub struct FocusRefreshTrigger {
    settled: AtomicBool,
}

impl FocusRefreshTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settled: AtomicBool::new(false),
        }
    }

    /// Records that the first fetch has settled, whatever its outcome.
    pub fn mark_settled(&self) {
        self.settled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn has_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// True iff a focus event arriving now should refetch.
    #[must_use]
    pub fn should_refresh_on_focus(&self) -> bool {
        self.has_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_focus_is_skipped() {
        let trigger = FocusRefreshTrigger::new();
        assert!(!trigger.should_refresh_on_focus());
    }

    #[test]
    fn focus_after_settling_refreshes() {
        let trigger = FocusRefreshTrigger::new();
        trigger.mark_settled();
        assert!(trigger.should_refresh_on_focus());
        // Settling is sticky.
        assert!(trigger.should_refresh_on_focus());
    }
}
