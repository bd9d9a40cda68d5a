//! Page-number pagination primitives shared by the recipe backend endpoints.
//!
//! The crate is transport agnostic: inbound adapters hand over the raw
//! `page` and `limit` query values plus the absolute request URL, and get
//! back a validated [`PageRequest`] and, once results are loaded, a
//! serialisable [`Page`] envelope with forward and backward links.
//!
//! ```
//! use pagination::{Page, PageRequest, PageSizePolicy};
//! use url::Url;
//!
//! let policy = PageSizePolicy::default();
//! let request = PageRequest::from_query(&policy, None, Some("5"))?;
//! assert_eq!(request.page_size(), 5);
//!
//! let base = Url::parse("http://localhost/api/v1/recipes?limit=5")?;
//! let page = Page::build(vec![1, 2, 3, 4, 5], 12, request, &base)?;
//! assert_eq!(page.results.len(), 5);
//! assert_eq!(
//!     page.next.as_deref(),
//!     Some("http://localhost/api/v1/recipes?limit=5&page=2")
//! );
//! assert!(page.previous.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod envelope;
mod error;
mod policy;
mod request;

pub use envelope::{PAGE_QUERY_PARAM, Page, page_count};
pub use error::PaginationError;
pub use policy::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, LIMIT_QUERY_PARAM, PageSizePolicy};
pub use request::PageRequest;
