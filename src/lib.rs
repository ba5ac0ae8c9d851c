//! Shared list-fetch core for the mobile logistics client.
//!
//! Every searchable, filterable, paginated list screen (quotes, loads,
//! warehouse positions, CRM customers) drives a [`ListFetchController`]
//! instead of wiring search, debounce, pagination and refresh by hand.
//! The controller guarantees that only the most recently requested
//! result ever reaches visible state, that nothing mutates after the
//! screen is torn down, and that rapid scroll events cannot dispatch
//! duplicate page requests.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod debounce;
pub mod error;
pub mod focus;
pub mod lifecycle;
pub mod paging;
pub mod sequencer;
pub mod source;
pub mod state;

use std::time::Duration;

pub use controller::{ControllerConfig, ListFetchController};
pub use error::{FetchError, FetchErrorKind};
pub use focus::FocusRefreshTrigger;
pub use lifecycle::LifecycleGuard;
pub use paging::{FetchMode, PageMeta, PageRequest, PageResponse, PaginationAccumulator};
pub use sequencer::{RequestSequencer, RequestToken};
pub use source::PageSource;
pub use state::{FetchState, FetchStatus, FilterCriteria, ListSnapshot};

/// Delay between the last search keystroke and the refetch it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Server pages are 1-based.
pub const FIRST_PAGE: u32 = 1;
