//! Page requests and paginated result sets.

use serde::{Deserialize, Serialize};

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested window into a result set, as read from query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Requested page, at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of items preceding the requested page.
    pub fn offset(&self) -> usize {
        (self.page() as usize - 1).saturating_mul(self.page_size() as usize)
    }
}

/// One page of a larger result set.
///
/// `total` counts the full matching set, not just `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paginated<T> {
    /// Cuts the requested page out of the full, already ordered, matching set.
    pub fn paginate(matching: Vec<T>, request: PageRequest) -> Self {
        let total = matching.len() as u64;
        let page_size = request.page_size();
        let items = matching
            .into_iter()
            .skip(request.offset())
            .take(page_size as usize)
            .collect();

        Self {
            items,
            total,
            page: request.page(),
            page_size,
        }
    }

    /// Total number of pages for the matching set.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size.max(1)))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Maps every item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unspecified() {
        let request = PageRequest::default();
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 1);

        let request = PageRequest::new(3, 10_000);
        assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn paginate_returns_requested_window_and_full_total() {
        let page = Paginated::paginate((1..=45).collect(), PageRequest::new(2, 20));
        assert_eq!(page.items, (21..=40).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next_page());
    }

    #[test]
    fn last_page_is_partial_and_never_exceeds_page_size() {
        let page = Paginated::paginate((1..=45).collect(), PageRequest::new(3, 20));
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_next_page());

        for size in 1..=12 {
            let page = Paginated::paginate((0..30).collect(), PageRequest::new(1, size));
            assert!(page.items.len() <= page.page_size as usize);
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Paginated::paginate(vec![1, 2, 3], PageRequest::new(9, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let page = Paginated::paginate(vec!["a"], PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "items": ["a"], "total": 1, "page": 1, "pageSize": 20 })
        );
    }
}
