//! Search, sort and pagination options accepted from the API layer.

use serde::{Deserialize, Serialize};

use crate::pagination::{Page, DEFAULT_PER_PAGE};
use crate::sort::SortOrder;

/// Per-request find options, independent of any entity-specific filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindOptions {
    /// Free-text search term, applied across the entity's searchable
    /// columns. Empty or whitespace-only terms are treated as absent.
    pub q: Option<String>,
    /// Requested sort key, resolved against the entity's allow-list.
    pub sort: Option<String>,
    /// Sort direction.
    pub direction: SortOrder,
    /// 1-indexed page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            q: None,
            sort: None,
            direction: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FindOptions {
    /// The pagination window these options describe.
    pub fn pagination(&self) -> Page {
        Page::new(self.page, self.per_page)
    }

    /// The search term, if present and non-empty after trimming.
    pub fn search_term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
