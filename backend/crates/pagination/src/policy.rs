//! Page size policy driven by the `limit` query parameter.

use std::num::NonZeroU32;

use crate::PaginationError;

/// Page size applied when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 6;
/// Upper bound applied to client supplied `limit` values.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
/// Query parameter carrying the page size override.
pub const LIMIT_QUERY_PARAM: &str = "limit";

/// Computes the page size for a request.
///
/// ## Invariants
/// - `default_size` and `max_size` are at least 1.
/// - `default_size <= max_size`.
///
/// A present, non-empty `limit` value must parse as a positive integer or the
/// request fails; values above `max_size` are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizePolicy {
    default_size: NonZeroU32,
    max_size: NonZeroU32,
}

impl PageSizePolicy {
    /// Build a policy from explicit bounds.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPolicy`] when either bound is zero
    /// or the default exceeds the maximum.
    pub fn new(default_size: u32, max_size: u32) -> Result<Self, PaginationError> {
        let default_bound =
            NonZeroU32::new(default_size).ok_or(PaginationError::InvalidPolicy {
                reason: "default page size must be at least 1",
            })?;
        let max_bound = NonZeroU32::new(max_size).ok_or(PaginationError::InvalidPolicy {
            reason: "maximum page size must be at least 1",
        })?;
        if default_bound > max_bound {
            return Err(PaginationError::InvalidPolicy {
                reason: "default page size must not exceed the maximum",
            });
        }
        Ok(Self {
            default_size: default_bound,
            max_size: max_bound,
        })
    }

    /// Page size used when no override is supplied.
    #[must_use]
    pub const fn default_size(&self) -> u32 {
        self.default_size.get()
    }

    /// Largest page size a client may request.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size.get()
    }

    /// Resolve the page size for the raw `limit` query value.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidLimit`] when `limit` is present but
    /// is not a positive integer.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageSizePolicy;
    ///
    /// let policy = PageSizePolicy::new(6, 50)?;
    /// assert_eq!(policy.page_size(None)?, 6);
    /// assert_eq!(policy.page_size(Some("12"))?, 12);
    /// assert_eq!(policy.page_size(Some("500"))?, 50);
    /// assert!(policy.page_size(Some("many")).is_err());
    /// # Ok::<(), pagination::PaginationError>(())
    /// ```
    pub fn page_size(&self, limit: Option<&str>) -> Result<u32, PaginationError> {
        let Some(raw) = limit.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(self.default_size());
        };
        let requested: i64 = raw
            .parse()
            .map_err(|_| PaginationError::invalid_limit(raw))?;
        if requested < 1 {
            return Err(PaginationError::invalid_limit(raw));
        }
        Ok(u32::try_from(requested).map_or(self.max_size(), |size| size.min(self.max_size())))
    }
}

impl Default for PageSizePolicy {
    fn default() -> Self {
        Self {
            default_size: NonZeroU32::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1),
            max_size: NonZeroU32::MIN.saturating_add(DEFAULT_MAX_PAGE_SIZE - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_policy_uses_documented_bounds() {
        let policy = PageSizePolicy::default();
        assert_eq!(policy.default_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(policy.max_size(), DEFAULT_MAX_PAGE_SIZE);
    }

    #[rstest]
    #[case(None, 6)]
    #[case(Some(""), 6)]
    #[case(Some("  "), 6)]
    #[case(Some("5"), 5)]
    #[case(Some(" 7 "), 7)]
    #[case(Some("100"), 100)]
    #[case(Some("101"), 100)]
    #[case(Some("99999999999"), 100)]
    fn resolves_page_size(#[case] limit: Option<&str>, #[case] expected: u32) {
        let policy = PageSizePolicy::default();
        assert_eq!(policy.page_size(limit).expect("valid limit"), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("1.5")]
    #[case("0")]
    #[case("-3")]
    fn rejects_malformed_limit(#[case] limit: &str) {
        let policy = PageSizePolicy::default();
        let err = policy.page_size(Some(limit)).expect_err("limit rejected");
        assert_eq!(err, PaginationError::invalid_limit(limit));
        assert!(err.is_malformed_input());
    }

    #[rstest]
    #[case(0, 10)]
    #[case(10, 0)]
    #[case(20, 10)]
    fn rejects_inconsistent_bounds(#[case] default_size: u32, #[case] max_size: u32) {
        let err = PageSizePolicy::new(default_size, max_size).expect_err("bounds rejected");
        assert!(matches!(err, PaginationError::InvalidPolicy { .. }));
    }
}
