//! Page-number pagination primitives for ordered listings.
//!
//! Listings are paginated in two steps. A [`Paginator`] first combines the
//! total item count with the page requested by the client to produce a
//! [`PageWindow`]: the clamped page number plus the offset and limit a
//! repository should fetch. Once the slice is loaded,
//! [`PageWindow::into_page`] wraps it into a [`Page`] carrying the metadata
//! templates need to render navigation links.
//!
//! Requested page numbers never fail. Missing or non-numeric values serve the
//! first page, numbers below one serve the first page, and numbers past the
//! end serve the last page.
//!
//! ```
//! use pagination::{PageRequest, Paginator};
//!
//! let paginator = Paginator::new(10).expect("page size is non-zero");
//! let window = paginator.window(23, PageRequest::from_query(Some("7")));
//! assert_eq!(window.number(), 3);
//! assert_eq!(window.offset(), 20);
//!
//! let page = window.into_page(vec!["a", "b", "c"]);
//! assert!(page.has_previous());
//! assert!(!page.has_next());
//! ```

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while configuring pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page sizes must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Page requested by a client, before it is clamped to a valid range.
///
/// Built from the raw `page` query parameter. Parsing is lenient: anything
/// that is not an integer resolves to the first page once a window is
/// computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest(Option<i64>);

impl PageRequest {
    /// Request the first page.
    #[must_use]
    pub const fn first() -> Self {
        Self(None)
    }

    /// Request an explicit page number.
    #[must_use]
    pub const fn number(number: i64) -> Self {
        Self(Some(number))
    }

    /// Interpret the raw value of a `page` query parameter.
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// assert_eq!(PageRequest::from_query(Some(" 2 ")), PageRequest::number(2));
    /// assert_eq!(PageRequest::from_query(Some("last")), PageRequest::first());
    /// assert_eq!(PageRequest::from_query(None), PageRequest::first());
    /// assert_eq!(
    ///     PageRequest::from_query(Some("99999999999999999999")),
    ///     PageRequest::number(i64::MAX),
    /// );
    /// ```
    ///
    /// Integers too large for `i64` saturate, so they still reach the last
    /// page.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        Self(raw.and_then(|value| match value.trim().parse::<i64>() {
            Ok(number) => Some(number),
            Err(error) => match error.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        }))
    }

    /// The page number as parsed, if any.
    #[must_use]
    pub const fn requested(self) -> Option<i64> {
        self.0
    }
}

/// Splits ordered listings into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    /// Create a paginator serving `per_page` items per page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub const fn new(per_page: u64) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self { per_page })
    }

    /// Number of items on every page except possibly the last.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages needed for `total` items. Always at least one, so an
    /// empty listing still renders a (blank) first page.
    #[must_use]
    pub const fn num_pages(&self, total: u64) -> u64 {
        let pages = total.div_ceil(self.per_page);
        if pages == 0 { 1 } else { pages }
    }

    /// Resolve `request` against a listing of `total` items.
    #[must_use]
    pub fn window(&self, total: u64, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match request.requested() {
            None => 1,
            Some(requested) if requested < 1 => 1,
            Some(requested) => u64::try_from(requested).map_or(1, |value| value.min(num_pages)),
        };
        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total,
        }
    }

    /// Paginate an already materialised listing.
    ///
    /// Used where a listing is small enough to be loaded whole; repositories
    /// backed by a database should fetch only [`PageWindow::offset`] and
    /// [`PageWindow::limit`] instead.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>, request: PageRequest) -> Page<T> {
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let window = self.window(total, request);
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        let slice = items.into_iter().skip(offset).take(limit).collect();
        window.into_page(slice)
    }
}

/// The slice of a listing selected for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    number: u64,
    num_pages: u64,
    per_page: u64,
    total: u64,
}

impl PageWindow {
    /// One-based page number after clamping.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total number of pages in the listing.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of items in the listing.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }

    /// Wrap the fetched slice with this window's metadata.
    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

/// One page of a listing together with navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    num_pages: u64,
    total: u64,
}

impl<T> Page<T> {
    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based number of this page.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of items across every page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether the listing spans more than one page.
    #[must_use]
    pub const fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.has_next() {
            Some(self.number.saturating_add(1))
        } else {
            None
        }
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        if self.has_previous() {
            Some(self.number.saturating_sub(1))
        } else {
            None
        }
    }

    /// Convert every item while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}
