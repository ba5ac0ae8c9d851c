use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a single dispatched fetch, minted at dispatch time
/// (not at completion).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing request tokens and decides whether a
/// completed request is still current.
///
/// This gives last-requested-wins semantics: a fast-completing request
/// issued before a newer one must never overwrite the newer one's
/// eventual result, not even transiently.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest_issued: AtomicU64,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest_issued: AtomicU64::new(0),
        }
    }

    /// Mints the next token. The counter never decrements.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest_issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// True iff `token` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest_issued.load(Ordering::Acquire) == token.0
    }

    #[must_use]
    pub fn latest_issued(&self) -> u64 {
        self.latest_issued.load(Ordering::Acquire)
    }
}
