//! Offset pagination derived from 1-indexed page numbers.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not specify one.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Upper bound on page size.
pub const MAX_PER_PAGE: u32 = 1000;

/// A page request. Page number and size are both 1-based; values below 1
/// clamp to 1 and sizes above [`MAX_PER_PAGE`] clamp down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Page {
    /// Create a page request, clamping out-of-range values.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Rows per page.
    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Generate the LIMIT/OFFSET clause. Both values are literals.
    pub fn to_sql(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.limit(), self.offset())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}
