//! Page selection passed to repository list operations
//!
//! Both numbers are non-zero by construction, so page arithmetic downstream
//! never has to guard against a zero divisor.
//!
//! # Example
//!
//! ```rust
//! use console_service::repository::Pagination;
//!
//! let pagination = Pagination::new(3, 20).unwrap();
//! assert_eq!(pagination.offset(), 40);
//! assert_eq!(pagination.limit(), 20);
//!
//! assert!(Pagination::new(1, 0).is_none());
//! ```

use std::num::NonZeroU32;

/// Default page number (1-indexed)
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated (page, size) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: NonZeroU32,
    size: NonZeroU32,
}

impl Pagination {
    /// Build a pagination, returning `None` if either value is zero
    #[must_use]
    pub fn new(page: u32, size: u32) -> Option<Self> {
        Some(Self {
            page: NonZeroU32::new(page)?,
            size: NonZeroU32::new(size)?,
        })
    }

    /// Current page number (1-indexed)
    #[must_use]
    pub const fn page(&self) -> NonZeroU32 {
        self.page
    }

    /// Records per page
    #[must_use]
    pub const fn size(&self) -> NonZeroU32 {
        self.size
    }

    /// Number of records to skip
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.size.get())
    }

    /// Maximum number of records to return
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size.get())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}
