//! Page requests and paged results shared by listing operations.

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on items per page.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A normalized page request: `page >= 1`, `1 <= limit <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from optional client input, clamping out-of-range
    /// values instead of rejecting them.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip, as bound into `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the numbers needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Convert the items while keeping the paging numbers.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let request = PageRequest::default();

        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_input() {
        let request = PageRequest::new(Some(0), Some(1_000));

        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), MAX_PAGE_LIMIT);

        assert_eq!(PageRequest::new(None, Some(0)).limit(), 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn page_reports_totals_and_more() {
        let page = Page::new(vec![1, 2], PageRequest::new(Some(1), Some(2)), 5);

        assert_eq!(page.total_pages(), 3);
        assert!(page.has_more());

        let last = Page::new(vec![5], PageRequest::new(Some(3), Some(2)), 5);

        assert!(!last.has_more());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<u8> = Page::new(Vec::new(), PageRequest::default(), 0);

        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_more());
    }
}
