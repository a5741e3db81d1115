//! Page-number pagination over ordered query results.

use serde::{Deserialize, Serialize};

/// Raw `page` query parameter.
///
/// Kept as a string so garbage input degrades to the first page instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    /// Requested page number; absent or non-numeric input means page 1.
    pub fn number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| n.max(1))
            .unwrap_or(1)
    }
}

/// Slices an ordered collection into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: i64,
}

/// Where a page sits inside the collection, in SQL terms.
#[derive(Debug, PartialEq, Eq)]
pub struct PageSpec {
    pub number: i64,
    pub limit: i64,
    pub offset: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Paginator {
    pub fn new(page_size: i64) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Locates the requested page. Numbers past the end clamp to the
    /// last populated page; an empty collection still has page 1.
    pub fn locate(&self, total_items: i64, requested: i64) -> PageSpec {
        let total_items = total_items.max(0);
        let total_pages = if total_items == 0 {
            1
        } else {
            (total_items + self.page_size - 1) / self.page_size
        };
        let number = requested.clamp(1, total_pages);
        PageSpec {
            number,
            limit: self.page_size,
            offset: (number - 1) * self.page_size,
            total_items,
            total_pages,
        }
    }
}

/// One page of items plus the metadata the presentation layer needs to
/// draw pager controls.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn assemble(items: Vec<T>, spec: &PageSpec) -> Self {
        Self {
            items,
            number: spec.number,
            total_items: spec.total_items,
            total_pages: spec.total_pages,
            has_next: spec.number < spec.total_pages,
            has_previous: spec.number > 1,
        }
    }
}
