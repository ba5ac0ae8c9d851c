use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn, Instrument};

use crate::debounce::DebounceScheduler;
use crate::error::FetchError;
use crate::focus::FocusRefreshTrigger;
use crate::lifecycle::LifecycleGuard;
use crate::paging::{FetchMode, PageRequest, PageResponse};
use crate::sequencer::{RequestSequencer, RequestToken};
use crate::source::PageSource;
use crate::state::{FetchState, FetchStatus, FilterCriteria, ListSnapshot};
use crate::{DEFAULT_PAGE_SIZE, FIRST_PAGE, SEARCH_DEBOUNCE};

/// Per-screen tuning. Quote and load screens ship different page sizes,
/// so this is a value rather than crate-wide constants alone.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub debounce: Duration,
    pub page_size: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: SEARCH_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Asynchronous, searchable, filterable, paginated list-fetch
/// controller.
///
/// Mediates between user input (search keystrokes, filter taps,
/// pull-to-refresh, scroll-triggered load-more, screen refocus) and a
/// [`PageSource`], guaranteeing that only the most recently requested
/// result is ever applied to visible state regardless of network
/// completion order.
///
/// Dropping the controller detaches it; superseded in-flight responses
/// and post-teardown completions are discarded without touching state.
pub struct ListFetchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<Inner<T>>,
}

struct Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    source: Arc<dyn PageSource<Item = T>>,
    config: ControllerConfig,
    runtime: Handle,
    state: Mutex<FetchState<T>>,
    sequencer: RequestSequencer,
    guard: LifecycleGuard,
    debounce: DebounceScheduler,
    focus: FocusRefreshTrigger,
    in_flight: Mutex<Option<AbortHandle>>,
    load_more_in_flight: AtomicBool,
    snapshots: watch::Sender<ListSnapshot<T>>,
}

impl<T> ListFetchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a detached-from-nothing, idle controller.
    ///
    /// Must be called from within a tokio runtime; the handle is
    /// captured here so operations may be invoked from whichever thread
    /// the shell calls in on.
    #[must_use]
    pub fn new(source: Arc<dyn PageSource<Item = T>>, config: ControllerConfig) -> Self {
        let state = FetchState::new();
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                runtime: Handle::current(),
                state: Mutex::new(state),
                sequencer: RequestSequencer::new(),
                guard: LifecycleGuard::new(),
                debounce: DebounceScheduler::new(),
                focus: FocusRefreshTrigger::new(),
                in_flight: Mutex::new(None),
                load_more_in_flight: AtomicBool::new(false),
                snapshots,
            }),
        }
    }

    /// Dispatches the mount-time fetch. Idempotent: only the first call
    /// on an idle controller does anything.
    pub fn start(&self) {
        if !self.inner.guard.is_active() {
            return;
        }
        {
            let state = self.inner.lock_state();
            if state.status() != FetchStatus::Idle {
                warn!("start called on a non-idle controller; ignoring");
                return;
            }
        }
        Arc::clone(&self.inner).dispatch_replace();
    }

    /// Stores the search text and schedules a debounced full refetch.
    /// The refetch reads the query at fire time, so only the final
    /// value of a burst of keystrokes is ever fetched.
    pub fn set_query(&self, text: impl Into<String>) {
        let inner = &self.inner;
        if !inner.guard.is_active() {
            return;
        }
        {
            let mut state = inner.lock_state();
            state.set_query(text.into());
            inner.publish(&state);
        }
        let task_inner = Arc::clone(inner);
        inner.debounce.schedule(&inner.runtime, inner.config.debounce, async move {
            task_inner.dispatch_replace();
        });
    }

    /// Stores the filter criteria and refetches immediately, without
    /// debounce. Subsumes any pending debounced query refetch.
    pub fn set_filter(&self, filter: FilterCriteria) {
        let inner = &self.inner;
        if !inner.guard.is_active() {
            return;
        }
        {
            let mut state = inner.lock_state();
            state.set_filter(filter);
            inner.publish(&state);
        }
        inner.debounce.cancel();
        Arc::clone(inner).dispatch_replace();
    }

    /// Pull-to-refresh: immediate full refetch (page 1, replace).
    pub fn refresh(&self) {
        if !self.inner.guard.is_active() {
            return;
        }
        self.inner.debounce.cancel();
        Arc::clone(&self.inner).dispatch_replace();
    }

    /// Fetches the next page and appends it. No-op while a load-more is
    /// already in flight or when the last page has been reached.
    pub fn load_more(&self) {
        Arc::clone(&self.inner).dispatch_load_more();
    }

    /// Screen regained focus. The first focus event coincides with the
    /// mount-time fetch and is skipped; later ones refetch with the
    /// controller's current query and filter.
    pub fn on_focus(&self) {
        if !self.inner.guard.is_active() {
            return;
        }
        if self.inner.focus.should_refresh_on_focus() {
            Arc::clone(&self.inner).dispatch_replace();
        } else {
            trace!("skipping mount-coincident focus event");
        }
    }

    /// Re-dispatches the failed fetch: a failed append retries the same
    /// next page, anything else refetches page 1. No-op unless the
    /// controller is in the failed state.
    pub fn retry(&self) {
        if !self.inner.guard.is_active() {
            return;
        }
        let failed_mode = {
            let state = self.inner.lock_state();
            if state.status() != FetchStatus::Failed {
                return;
            }
            state.failed_mode()
        };
        match failed_mode {
            Some(FetchMode::Append) => Arc::clone(&self.inner).dispatch_load_more(),
            _ => {
                self.inner.debounce.cancel();
                Arc::clone(&self.inner).dispatch_replace();
            }
        }
    }

    /// Tears the controller down: no state mutation can happen after
    /// this returns. Safe to call more than once; also runs on drop.
    pub fn detach(&self) {
        self.inner.teardown();
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.guard.is_active()
    }

    /// Current read-only view of the fetch state.
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.inner.lock_state().snapshot()
    }

    /// Push-style observation: yields a new snapshot whenever state
    /// changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.inner.snapshots.subscribe()
    }
}

impl<T> Drop for ListFetchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn lock_state(&self) -> MutexGuard<'_, FetchState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &FetchState<T>) {
        self.snapshots.send_replace(state.snapshot());
    }

    /// Full refetch: page 1, replace. Whether this renders as the
    /// initial skeleton or a refresh spinner depends only on whether a
    /// first fetch has settled yet.
    fn dispatch_replace(self: Arc<Self>) {
        if !self.guard.is_active() {
            return;
        }
        // A replace supersedes any in-flight load-more.
        self.load_more_in_flight.store(false, Ordering::Release);
        let status = if self.focus.has_settled() {
            FetchStatus::Refreshing
        } else {
            FetchStatus::LoadingInitial
        };
        self.dispatch(FIRST_PAGE, FetchMode::Replace, status);
    }

    fn dispatch_load_more(self: Arc<Self>) {
        if !self.guard.is_active() {
            return;
        }
        if self.load_more_in_flight.swap(true, Ordering::AcqRel) {
            trace!("load_more ignored: already in flight");
            return;
        }
        let next_page = {
            let state = self.lock_state();
            // Failed is accepted so a failed append can be retried.
            if state.status().is_settled() {
                state.next_page()
            } else {
                None
            }
        };
        let Some(page) = next_page else {
            self.load_more_in_flight.store(false, Ordering::Release);
            trace!("load_more ignored: no further page");
            return;
        };
        self.dispatch(page, FetchMode::Append, FetchStatus::LoadingMore);
    }

    fn dispatch(self: Arc<Self>, page: u32, mode: FetchMode, status: FetchStatus) {
        // Token issuance and the status transition must be one atomic
        // step: operations may arrive from any shell thread, and a
        // token issued outside the lock could be superseded (and its
        // completion discarded) before its own `begin` lands, leaving
        // a spinner with nothing in flight. Completions check
        // `is_current` under this same lock.
        let (token, request) = {
            let mut state = self.lock_state();
            let token = self.sequencer.issue();
            state.begin(status);
            let request = PageRequest {
                query: state.query().to_owned(),
                filter: state.filter().clone(),
                page,
                page_size: self.config.page_size,
            };
            self.publish(&state);
            (token, request)
        };
        debug!(
            token = token.id(),
            page,
            ?mode,
            query = %request.query,
            "dispatching fetch"
        );
        let span = tracing::debug_span!("fetch", token = token.id(), page, ?mode);
        let task = self.runtime.spawn(
            {
                let inner = Arc::clone(&self);
                async move {
                    let result = inner.source.fetch_page(request).await;
                    inner.complete(token, mode, result);
                }
            }
            .instrument(span),
        );
        // Only the latest dispatch is tracked; older tasks are already
        // stale by token and are left to finish and be discarded.
        self.lock_in_flight().replace(task.abort_handle());
    }

    fn complete(&self, token: RequestToken, mode: FetchMode, result: Result<PageResponse<T>, FetchError>) {
        if !self.guard.is_active() {
            trace!(token = token.id(), "dropping completion after teardown");
            return;
        }
        let mut state = self.lock_state();
        if !self.sequencer.is_current(token) {
            debug!(
                token = token.id(),
                latest = self.sequencer.latest_issued(),
                "discarding stale completion"
            );
            return;
        }
        if mode.appends() {
            self.load_more_in_flight.store(false, Ordering::Release);
        }
        self.focus.mark_settled();
        match result {
            Ok(response) => {
                debug!(
                    token = token.id(),
                    count = response.items.len(),
                    current_page = response.current_page,
                    last_page = response.last_page,
                    "applying fetch result"
                );
                state.apply_success(response, mode);
            }
            Err(error) => {
                warn!(token = token.id(), code = error.code(), "fetch failed");
                state.apply_failure(error, mode);
            }
        }
        self.publish(&state);
    }

    fn teardown(&self) {
        if !self.guard.deactivate() {
            return;
        }
        self.debounce.cancel();
        if let Some(task) = self.lock_in_flight().take() {
            task.abort();
        }
        trace!("controller detached");
    }
}
