//! Paged view over a backing record list.
//!
//! [`PagedList`] owns the materialized records of one iteration for the
//! lifetime of a request, together with the page size and the requested
//! page. [`PageMetrics`] is the pure arithmetic behind it, shared with
//! navigation.
//!
//! The requested page is stored as given and clamped when read, so changing
//! the page size after selecting a page stays consistent.

use std::ops::Range;

use serde::Serialize;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{PagesError, Result};

/// Page arithmetic for one page of a list.
///
/// ```
/// use folio::PageMetrics;
///
/// let metrics = PageMetrics::new(2, 10, 25).unwrap();
/// assert_eq!(metrics.page_count(), 3);
/// assert_eq!(metrics.first_index_on_page(), 20);
/// assert_eq!(metrics.last_index_on_page(), Some(24));
/// assert!(metrics.is_last_page());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    page: usize,
    page_size: usize,
    total_count: usize,
}

impl PageMetrics {
    /// Computes metrics, clamping `page` into the valid range.
    pub fn new(page: usize, page_size: usize, total_count: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(PagesError::InvalidPageSize(page_size.to_string()));
        }
        let page_count = total_count.div_ceil(page_size);
        Ok(PageMetrics {
            page: page.min(page_count.saturating_sub(1)),
            page_size,
            total_count,
        })
    }

    /// Effective 0-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of pages; 0 for an empty list.
    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn first_index_on_page(&self) -> usize {
        self.page * self.page_size
    }

    /// Index of the last record on the page, `None` for an empty list.
    pub fn last_index_on_page(&self) -> Option<usize> {
        let last = self.total_count.checked_sub(1)?;
        Some((self.first_index_on_page() + self.page_size - 1).min(last))
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn is_last_page(&self) -> bool {
        let page_count = self.page_count();
        page_count == 0 || self.page == page_count - 1
    }

    /// Index range of the records on the page.
    pub fn range(&self) -> Range<usize> {
        match self.last_index_on_page() {
            Some(last) => self.first_index_on_page()..last + 1,
            None => 0..0,
        }
    }

    /// Window of at most `max` page indexes around the current page.
    pub fn linked_pages(&self, max: usize) -> Vec<usize> {
        let page_count = self.page_count();
        if page_count == 0 || max == 0 {
            return Vec::new();
        }
        let first = self.page.saturating_sub(max / 2);
        let last = (first + max - 1).min(page_count - 1);
        let first = (last + 1).saturating_sub(max).min(first);
        (first..=last).collect()
    }
}

/// Parses a page size attribute. Zero, negative and non-numeric input fail.
pub fn parse_page_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<i64>() {
        Ok(size) if size > 0 => {
            usize::try_from(size).map_err(|_| PagesError::InvalidPageSize(raw.to_string()))
        }
        _ => Err(PagesError::InvalidPageSize(raw.to_string())),
    }
}

/// Parses a page index request parameter. Negative values clamp to 0.
pub fn parse_page_index(raw: &str) -> Result<usize> {
    let index = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| PagesError::InvalidPageIndex(raw.to_string()))?;
    Ok(usize::try_from(index).unwrap_or(0))
}

/// A request-scoped list split into pages.
#[derive(Debug, Clone)]
pub struct PagedList<R> {
    original: Vec<R>,
    page_size: usize,
    page: usize,
}

impl<R> PagedList<R> {
    /// Wraps `original` with the default page size, on the first page.
    pub fn new(original: Vec<R>) -> Self {
        PagedList {
            original,
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
        }
    }

    /// The backing records in their current order.
    pub fn original(&self) -> &[R] {
        &self.original
    }

    /// Mutable access to the backing records.
    ///
    /// Sorting reorders this list in place; pagination and export read the
    /// new order for the rest of the request.
    pub fn original_mut(&mut self) -> &mut Vec<R> {
        &mut self.original
    }

    pub fn into_inner(self) -> Vec<R> {
        self.original
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the page size; zero fails with [`PagesError::InvalidPageSize`].
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(PagesError::InvalidPageSize(page_size.to_string()));
        }
        self.page_size = page_size;
        Ok(())
    }

    /// Requests a page. Out-of-range indexes are clamped when read.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Effective 0-based page index.
    pub fn page(&self) -> usize {
        self.metrics().page()
    }

    pub fn metrics(&self) -> PageMetrics {
        let page_count = self.original.len().div_ceil(self.page_size);
        PageMetrics {
            page: self.page.min(page_count.saturating_sub(1)),
            page_size: self.page_size,
            total_count: self.original.len(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.metrics().page_count()
    }

    pub fn first_index_on_page(&self) -> usize {
        self.metrics().first_index_on_page()
    }

    pub fn last_index_on_page(&self) -> Option<usize> {
        self.metrics().last_index_on_page()
    }

    pub fn is_first_page(&self) -> bool {
        self.metrics().is_first_page()
    }

    pub fn is_last_page(&self) -> bool {
        self.metrics().is_last_page()
    }

    /// The records on the current page; empty for an empty list.
    pub fn page_items(&self) -> &[R] {
        &self.original[self.metrics().range()]
    }

    /// Moves to the next page unless on the last one.
    pub fn next_page(&mut self) {
        if !self.is_last_page() {
            self.page = self.page() + 1;
        }
    }

    /// Moves to the previous page unless on the first one.
    pub fn previous_page(&mut self) {
        if !self.is_first_page() {
            self.page = self.page() - 1;
        }
    }

    pub fn linked_pages(&self, max: usize) -> Vec<usize> {
        self.metrics().linked_pages(max)
    }
}

impl<R> From<Vec<R>> for PagedList<R> {
    fn from(original: Vec<R>) -> Self {
        PagedList::new(original)
    }
}
