//! Errors raised while interpreting pagination input.

/// Failures produced by page size policies, page requests, and envelopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The `limit` query value is not a positive integer.
    #[error("limit must be a positive integer, got `{value}`")]
    InvalidLimit {
        /// Raw value supplied by the client.
        value: String,
    },
    /// The `page` query value is not a positive integer.
    #[error("page must be a positive integer, got `{value}`")]
    InvalidPage {
        /// Raw value supplied by the client.
        value: String,
    },
    /// The requested page lies beyond the last page of the collection.
    #[error("page {page} is beyond the last page ({last})")]
    PageOutOfRange {
        /// Requested page number.
        page: u32,
        /// Last available page number.
        last: u64,
    },
    /// The configured policy bounds are inconsistent.
    #[error("invalid page size policy: {reason}")]
    InvalidPolicy {
        /// Description of the violated bound.
        reason: &'static str,
    },
}

impl PaginationError {
    /// Build an [`PaginationError::InvalidLimit`] from the raw value.
    pub fn invalid_limit(value: impl Into<String>) -> Self {
        Self::InvalidLimit {
            value: value.into(),
        }
    }

    /// Build an [`PaginationError::InvalidPage`] from the raw value.
    pub fn invalid_page(value: impl Into<String>) -> Self {
        Self::InvalidPage {
            value: value.into(),
        }
    }

    /// Return `true` when the error stems from malformed client input rather
    /// than a request for a page that does not exist.
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InvalidLimit { .. } | Self::InvalidPage { .. })
    }
}
