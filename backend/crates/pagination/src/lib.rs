//! Offset/limit pagination primitives shared by the todo backend endpoints.
//!
//! Inbound adapters deserialize raw `skip`/`limit` query parameters into
//! [`PageParams`] and convert them into a validated [`Page`]. The page is
//! what repositories receive, so every listing operation shares the same
//! bounds: both values are non-negative and `limit` never exceeds
//! [`MAX_LIMIT`].
//!
//! # Examples
//! ```
//! use pagination::{Page, PageParams, MAX_LIMIT};
//!
//! let params = PageParams { skip: Some(10), limit: Some(5_000) };
//! let page = Page::try_from(params).expect("non-negative parameters");
//! assert_eq!(page.skip(), 10);
//! assert_eq!(page.limit(), MAX_LIMIT);
//! ```

use serde::{Deserialize, Serialize};

/// Number of items returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: u32 = 100;

/// Upper bound applied to every requested limit to prevent unbounded scans.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised when raw pagination parameters are out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// `skip` was negative.
    #[error("skip must be a non-negative integer, got {value}")]
    NegativeSkip {
        /// Rejected value.
        value: i64,
    },
    /// `limit` was negative.
    #[error("limit must be a non-negative integer, got {value}")]
    NegativeLimit {
        /// Rejected value.
        value: i64,
    },
}

impl PageError {
    /// Name of the offending query parameter.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NegativeSkip { .. } => "skip",
            Self::NegativeLimit { .. } => "limit",
        }
    }
}

/// Raw pagination parameters as received from a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Number of leading items to skip.
    pub skip: Option<i64>,
    /// Maximum number of items to return.
    pub limit: Option<i64>,
}

/// Validated offset/limit window.
///
/// ## Invariants
/// - `limit` is at most [`MAX_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: u64,
    limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_LIMIT)
    }
}

impl Page {
    /// Build a page, clamping `limit` to [`MAX_LIMIT`].
    ///
    /// # Examples
    /// ```
    /// use pagination::Page;
    ///
    /// let page = Page::new(0, 250);
    /// assert_eq!(page.limit(), 100);
    /// ```
    #[must_use]
    pub const fn new(skip: u64, limit: u32) -> Self {
        let limit = if limit > MAX_LIMIT { MAX_LIMIT } else { limit };
        Self { skip, limit }
    }

    /// Number of leading items skipped.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum number of items returned.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset expressed as a SQL `OFFSET` value.
    #[must_use]
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// Limit expressed as a SQL `LIMIT` value.
    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Apply the window to an already ordered iterator.
    ///
    /// # Examples
    /// ```
    /// use pagination::Page;
    ///
    /// let window: Vec<u32> = Page::new(2, 3).apply(1..=10).collect();
    /// assert_eq!(window, vec![3, 4, 5]);
    /// ```
    pub fn apply<I>(&self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(limit)
    }
}

impl TryFrom<PageParams> for Page {
    type Error = PageError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        let skip = match params.skip {
            None => 0,
            Some(value) => u64::try_from(value).map_err(|_| PageError::NegativeSkip { value })?,
        };
        let limit = match params.limit {
            None => DEFAULT_LIMIT,
            Some(value) if value < 0 => return Err(PageError::NegativeLimit { value }),
            Some(value) => u32::try_from(value).unwrap_or(MAX_LIMIT),
        };
        Ok(Self::new(skip, limit))
    }
}
