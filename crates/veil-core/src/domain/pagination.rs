//! Pagination helpers shared by list operations.

use serde::{Deserialize, Serialize};

/// A 1-based page request.
///
/// Out-of-range values are tolerated rather than rejected: page numbers
/// below 1 read the first page and the page size is clamped to
/// `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u64 = 20;
    pub const MAX_PAGE_SIZE: u64 = 100;

    #[must_use]
    pub const fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Effective page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        if self.page_size == 0 {
            1
        } else if self.page_size > Self::MAX_PAGE_SIZE {
            Self::MAX_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Rows to skip before the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        let page = if self.page == 0 { 1 } else { self.page };
        (page - 1).saturating_mul(self.limit())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total row count for the same predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_zero_offset() {
        let req = PageRequest::new(1, 25);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn offset_scales_with_page_number() {
        let req = PageRequest::new(4, 10);
        assert_eq!(req.offset(), 30);
    }

    #[test]
    fn page_zero_reads_first_page() {
        let req = PageRequest::new(0, 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PageRequest::new(1, 0).limit(), 1);
        assert_eq!(PageRequest::new(1, 10_000).limit(), PageRequest::MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let req = PageRequest::new(u64::MAX, PageRequest::MAX_PAGE_SIZE);
        assert_eq!(req.offset(), u64::MAX);
    }
}
