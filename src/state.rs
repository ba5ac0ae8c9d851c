use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::FetchError;
use crate::paging::{FetchMode, PageMeta, PageResponse, PaginationAccumulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    LoadingInitial,
    Refreshing,
    LoadingMore,
    Ready,
    Failed,
}

impl FetchStatus {
    #[must_use]
    pub const fn is_fetching(self) -> bool {
        matches!(self, Self::LoadingInitial | Self::Refreshing | Self::LoadingMore)
    }

    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Opaque key/value filter criteria (status, customer id, date range…).
///
/// Semantics belong to the REST layer; the controller only carries the
/// values through. Ordered so snapshots are stable across the FFI
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria(BTreeMap<String, String>);

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Mutable per-screen fetch state, owned exclusively by one controller
/// instance and mutated only through its operations.
#[derive(Debug)]
pub struct FetchState<T> {
    query: String,
    filter: FilterCriteria,
    list: PaginationAccumulator<T>,
    status: FetchStatus,
    error: Option<FetchError>,
    failed_mode: Option<FetchMode>,
}

impl<T> FetchState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: String::new(),
            filter: FilterCriteria::new(),
            list: PaginationAccumulator::new(),
            status: FetchStatus::Idle,
            error: None,
            failed_mode: None,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.list.items()
    }

    #[must_use]
    pub fn pagination(&self) -> Option<PageMeta> {
        self.list.meta()
    }

    #[must_use]
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.list.has_more()
    }

    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.list.next_page()
    }

    #[must_use]
    pub(crate) fn failed_mode(&self) -> Option<FetchMode> {
        self.failed_mode
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub(crate) fn set_filter(&mut self, filter: FilterCriteria) {
        self.filter = filter;
    }

    /// Marks a fetch as dispatched. Existing items stay visible until
    /// the response is accepted.
    pub(crate) fn begin(&mut self, status: FetchStatus) {
        self.status = status;
    }

    pub(crate) fn apply_success(&mut self, response: PageResponse<T>, mode: FetchMode) {
        self.list.apply(response, mode);
        self.status = FetchStatus::Ready;
        self.error = None;
        self.failed_mode = None;
    }

    /// Records a failure without touching already-rendered items.
    pub(crate) fn apply_failure(&mut self, error: FetchError, mode: FetchMode) {
        self.status = FetchStatus::Failed;
        self.error = Some(error);
        self.failed_mode = Some(mode);
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T>
    where
        T: Clone,
    {
        ListSnapshot {
            query: self.query.clone(),
            filter: self.filter.clone(),
            items: self.list.items().to_vec(),
            pagination: self.list.meta(),
            status: self.status,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the fetch state handed to the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub query: String,
    pub filter: FilterCriteria,
    pub items: Vec<T>,
    pub pagination: Option<PageMeta>,
    pub status: FetchStatus,
    pub error: Option<FetchError>,
}

impl<T> ListSnapshot<T> {
    #[must_use]
    pub fn loading_initial(&self) -> bool {
        self.status == FetchStatus::LoadingInitial
    }

    #[must_use]
    pub fn refreshing(&self) -> bool {
        self.status == FetchStatus::Refreshing
    }

    #[must_use]
    pub fn loading_more(&self) -> bool {
        self.status == FetchStatus::LoadingMore
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == FetchStatus::Failed
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination.map_or(false, PageMeta::has_more)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;

    fn page(items: &[&str], current_page: u32, last_page: u32) -> PageResponse<String> {
        PageResponse {
            items: items.iter().map(ToString::to_string).collect(),
            current_page,
            last_page,
            total: 0,
        }
    }

    #[test]
    fn filter_criteria_builder() {
        let filter = FilterCriteria::new()
            .with("status", "pending")
            .with("customer_id", "42");
        assert_eq!(filter.get("status"), Some("pending"));
        assert_eq!(filter.get("customer_id"), Some("42"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn filter_criteria_last_value_wins() {
        let mut filter = FilterCriteria::new().with("status", "pending");
        filter.set("status", "delivered");
        assert_eq!(filter.get("status"), Some("delivered"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn failure_retains_items_and_success_clears_error() {
        let mut state: FetchState<String> = FetchState::new();
        state.apply_success(page(&["a", "b"], 1, 2), FetchMode::Replace);
        assert_eq!(state.status(), FetchStatus::Ready);

        state.apply_failure(
            FetchError::new(FetchErrorKind::Network, "offline"),
            FetchMode::Append,
        );
        assert_eq!(state.status(), FetchStatus::Failed);
        assert_eq!(state.items(), ["a", "b"]);
        assert_eq!(state.failed_mode(), Some(FetchMode::Append));

        state.apply_success(page(&["c", "d"], 2, 2), FetchMode::Append);
        assert!(state.error().is_none());
        assert!(state.failed_mode().is_none());
        assert_eq!(state.items(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut state: FetchState<String> = FetchState::new();
        state.set_query("acme".into());
        state.begin(FetchStatus::LoadingInitial);
        let snapshot = state.snapshot();
        assert!(snapshot.loading_initial());
        assert_eq!(snapshot.query, "acme");
        assert!(!snapshot.has_more());

        state.apply_success(page(&["a"], 1, 3), FetchMode::Replace);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.status, FetchStatus::Ready);
        assert!(snapshot.has_more());
        assert_eq!(snapshot.pagination.unwrap().last_page, 3);
    }
}
