//! Validated page coordinates derived from `page` and `limit`.

use std::num::NonZeroU32;

use crate::{PageSizePolicy, PaginationError};

/// One-based page number plus page size.
///
/// ## Invariants
/// - `page >= 1` and `page_size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU32,
    page_size: NonZeroU32,
}

impl PageRequest {
    /// Build a request from already-parsed values.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPage`] for page `0` and
    /// [`PaginationError::InvalidLimit`] for a zero page size.
    pub fn new(page: u32, page_size: u32) -> Result<Self, PaginationError> {
        let page_number =
            NonZeroU32::new(page).ok_or_else(|| PaginationError::invalid_page(page.to_string()))?;
        let size = NonZeroU32::new(page_size)
            .ok_or_else(|| PaginationError::invalid_limit(page_size.to_string()))?;
        Ok(Self {
            page: page_number,
            page_size: size,
        })
    }

    /// First page with the policy's default size.
    #[must_use]
    pub fn first(policy: &PageSizePolicy) -> Self {
        Self {
            page: NonZeroU32::MIN,
            page_size: NonZeroU32::new(policy.default_size()).unwrap_or(NonZeroU32::MIN),
        }
    }

    /// Interpret raw `page` and `limit` query values under `policy`.
    ///
    /// An absent or empty `page` selects the first page.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPage`] or
    /// [`PaginationError::InvalidLimit`] for malformed values.
    pub fn from_query(
        policy: &PageSizePolicy,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, PaginationError> {
        let size = policy.page_size(limit)?;
        let number = match page.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => 1,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value >= 1)
                .ok_or_else(|| PaginationError::invalid_page(raw))?,
        };
        Self::new(number, size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page.get()
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Number of items to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.page_size())
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size())
    }
}
