//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, the derived page-metadata block
//! returned alongside paginated listings, and helpers to normalize inputs.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// Metadata block echoed with every paginated response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
    /// 1-based index of the first item on this page, null when the page is empty
    pub from: Option<u64>,
    /// 1-based index of the last item on this page, null when the page is empty
    pub to: Option<u64>,
}

impl PageMeta {
    /// Derive the block for a fetched page holding `count` of `total` items.
    pub fn compute(total: u64, page_idx: u64, per_page: u64, count: u64) -> Self {
        let last_page = if total == 0 { 1 } else { total.div_ceil(per_page) };
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            let from = page_idx * per_page + 1;
            (Some(from), Some(from + count - 1))
        };
        Self {
            total,
            per_page,
            current_page: page_idx + 1,
            last_page,
            from,
            to,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::{PageMeta, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn meta_for_second_page_of_fifteen() {
        let meta = PageMeta::compute(15, 1, 10, 5);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.per_page, 10);
        assert_eq!(meta.total, 15);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(15));
    }

    #[test]
    fn meta_for_empty_result() {
        let meta = PageMeta::compute(0, 0, 10, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.from, None);
        assert_eq!(meta.to, None);
    }

    #[test]
    fn meta_for_page_past_the_end() {
        let meta = PageMeta::compute(15, 4, 10, 0);
        assert_eq!(meta.current_page, 5);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.from, None);
    }
}
