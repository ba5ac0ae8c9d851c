use serde::{Deserialize, Serialize};

use crate::state::FilterCriteria;

/// Whether a fetch's result overwrites the visible items or is
/// concatenated onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    Replace,
    Append,
}

impl FetchMode {
    #[must_use]
    pub const fn appends(self) -> bool {
        matches!(self, Self::Append)
    }
}

/// Arguments of one call against the data collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub query: String,
    pub filter: FilterCriteria,
    pub page: u32,
    pub page_size: u32,
}

/// One page of results plus the server-reported page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl PageMeta {
    #[must_use]
    pub const fn has_more(self) -> bool {
        self.current_page < self.last_page
    }
}

/// Accumulates pages into the visible item collection.
///
/// Replace overwrites wholesale (page 1 semantics); append concatenates
/// in arrival order without de-duplication — the server is trusted not
/// to repeat rows across pages. Page metadata is taken from every
/// response unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationAccumulator<T> {
    items: Vec<T>,
    meta: Option<PageMeta>,
}

impl<T> PaginationAccumulator<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
        }
    }

    pub fn apply(&mut self, response: PageResponse<T>, mode: FetchMode) {
        match mode {
            FetchMode::Replace => self.items = response.items,
            FetchMode::Append => self.items.extend(response.items),
        }
        self.meta = Some(PageMeta {
            current_page: response.current_page,
            last_page: response.last_page,
            total: response.total,
        });
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn meta(&self) -> Option<PageMeta> {
        self.meta
    }

    /// False until at least one response has been applied.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.meta.map_or(false, PageMeta::has_more)
    }

    /// The page a load-more fetch should request, if any remains.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.meta
            .filter(|m| m.has_more())
            .map(|m| m.current_page + 1)
    }
}

impl<T> Default for PaginationAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(items: &[&str], current_page: u32, last_page: u32, total: u64) -> PageResponse<String> {
        PageResponse {
            items: items.iter().map(ToString::to_string).collect(),
            current_page,
            last_page,
            total,
        }
    }

    #[test]
    fn empty_accumulator_has_no_more() {
        let accumulator: PaginationAccumulator<String> = PaginationAccumulator::new();
        assert!(!accumulator.has_more());
        assert_eq!(accumulator.next_page(), None);
        assert!(accumulator.items().is_empty());
    }

    #[test]
    fn replace_overwrites_items_wholesale() {
        let mut accumulator = PaginationAccumulator::new();
        accumulator.apply(page(&["a", "b"], 1, 3, 6), FetchMode::Replace);
        accumulator.apply(page(&["c", "d"], 2, 3, 6), FetchMode::Append);
        accumulator.apply(page(&["x", "y"], 1, 1, 2), FetchMode::Replace);

        assert_eq!(accumulator.items(), ["x", "y"]);
        assert!(!accumulator.has_more());
    }

    #[test]
    fn append_concatenates_in_arrival_order() {
        let mut accumulator = PaginationAccumulator::new();
        accumulator.apply(page(&["a", "b"], 1, 2, 4), FetchMode::Replace);
        assert!(accumulator.has_more());
        assert_eq!(accumulator.next_page(), Some(2));

        accumulator.apply(page(&["c", "d"], 2, 2, 4), FetchMode::Append);
        assert_eq!(accumulator.items(), ["a", "b", "c", "d"]);
        assert!(!accumulator.has_more());
        assert_eq!(accumulator.next_page(), None);
    }

    #[test]
    fn duplicates_across_pages_are_kept() {
        let mut accumulator = PaginationAccumulator::new();
        accumulator.apply(page(&["a", "b"], 1, 2, 3), FetchMode::Replace);
        accumulator.apply(page(&["b"], 2, 2, 3), FetchMode::Append);
        assert_eq!(accumulator.items(), ["a", "b", "b"]);
    }

    #[test]
    fn metadata_is_taken_from_every_response() {
        let mut accumulator = PaginationAccumulator::new();
        accumulator.apply(page(&["a"], 1, 5, 50), FetchMode::Replace);
        accumulator.apply(page(&["b"], 2, 4, 40), FetchMode::Append);

        let meta = accumulator.meta().unwrap();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 4);
        assert_eq!(meta.total, 40);
    }

    proptest! {
        #[test]
        fn every_appended_page_lands_exactly_once_in_order(
            pages in prop::collection::vec(
                prop::collection::vec("[a-z]{1,8}", 0..5),
                1..6,
            )
        ) {
            let mut accumulator = PaginationAccumulator::new();
            let last_page = pages.len() as u32;
            let mut expected: Vec<String> = Vec::new();

            for (index, items) in pages.iter().enumerate() {
                let mode = if index == 0 {
                    FetchMode::Replace
                } else {
                    FetchMode::Append
                };
                expected.extend(items.iter().cloned());
                let current_page = index as u32 + 1;
                accumulator.apply(
                    PageResponse {
                        items: items.clone(),
                        current_page,
                        last_page,
                        total: expected.len() as u64,
                    },
                    mode,
                );
                prop_assert_eq!(accumulator.has_more(), current_page < last_page);
            }

            prop_assert_eq!(
                accumulator.items().len(),
                pages.iter().map(Vec::len).sum::<usize>()
            );
            prop_assert_eq!(accumulator.items(), expected.as_slice());
        }
    }
}
