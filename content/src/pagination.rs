use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ContentError;

/// Page position within a paginated listing.
///
/// After [`Pagination::new`] or [`Pagination::normalized`],
/// `pages_count == ceil(items_count / page_size)` and `current_page` lies in
/// `1..=pages_count` whenever there are items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub pages_count: u32,
    #[serde(default)]
    pub items_count: u64,
    #[serde(default)]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

impl Pagination {
    pub fn new(current_page: u32, page_size: u32, items_count: u64) -> Self {
        let page_size = page_size.max(1);
        let pages_count = items_count.div_ceil(u64::from(page_size));
        let pages_count = u32::try_from(pages_count).unwrap_or(u32::MAX);
        let current_page = if pages_count == 0 {
            1
        } else {
            current_page.clamp(1, pages_count)
        };

        Self {
            current_page,
            pages_count,
            items_count,
            page_size,
        }
    }

    /// Empty listing
    pub fn empty(page_size: u32) -> Self {
        Self::new(1, page_size, 0)
    }

    /// Recompute derived fields from the item count, for pagination received
    /// from the backend. `requested_page_size` is used when the payload omits it.
    pub fn normalized(self, requested_page_size: u32) -> Self {
        let page_size = if self.page_size == 0 {
            requested_page_size
        } else {
            self.page_size
        };
        let fixed = Self::new(self.current_page, page_size, self.items_count);
        if fixed.pages_count != self.pages_count || fixed.current_page != self.current_page {
            warn!(
                "Backend pagination inconsistent (page {}/{} for {} items), corrected to {}/{}",
                self.current_page,
                self.pages_count,
                self.items_count,
                fixed.current_page,
                fixed.pages_count
            );
        }
        fixed
    }

    /// Zero-based index of the first item on the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.pages_count
    }

    /// Validate a requested page position before sending it to the backend
    pub fn check_request(page: u32, page_size: u32) -> Result<(), ContentError> {
        if page == 0 {
            return Err(ContentError::InvalidPagination(
                "page numbers start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(ContentError::InvalidPagination(
                "page size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One page of a listing as returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::empty(page_size),
        }
    }

    /// True when the listing has more items than this page carries
    pub fn is_truncated(&self) -> bool {
        self.pagination.items_count > self.data.len() as u64
    }
}
