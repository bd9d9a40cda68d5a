//! Serialisable page envelope with navigation links.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{PageRequest, PaginationError};

/// Query parameter carrying the one-based page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Number of pages needed to hold `total` items, never less than one.
///
/// An empty collection still has a (blank) first page.
#[must_use]
pub fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

/// One page of results.
///
/// `next` and `previous` are absolute URLs derived from the request URL with
/// every other query parameter preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Link to the following page, if any.
    pub next: Option<String>,
    /// Link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble the envelope for `request` over a collection of `total` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::PageOutOfRange`] when the requested page lies
    /// beyond the last page.
    pub fn build(
        results: Vec<T>,
        total: u64,
        request: PageRequest,
        base: &Url,
    ) -> Result<Self, PaginationError> {
        let last = page_count(total, request.page_size());
        let current = u64::from(request.page());
        if current > last {
            return Err(PaginationError::PageOutOfRange {
                page: request.page(),
                last,
            });
        }

        let next = (current < last).then(|| link_to(base, Some(current + 1)));
        let previous = (current > 1).then(|| {
            let target = current - 1;
            link_to(base, (target > 1).then_some(target))
        });

        Ok(Self {
            count: total,
            next,
            previous,
            results,
        })
    }

    /// Transform every item while keeping the navigation metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn link_to(base: &Url, page: Option<u64>) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    if !retained.is_empty() || page.is_some() {
        let mut pairs = link.query_pairs_mut();
        pairs.extend_pairs(retained);
        if let Some(number) = page {
            pairs.append_pair(PAGE_QUERY_PARAM, &number.to_string());
        }
    }
    link.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Url {
        Url::parse("http://testserver/api/v1/recipes?limit=5").expect("valid url")
    }

    #[rstest]
    #[case(0, 6, 1)]
    #[case(1, 6, 1)]
    #[case(12, 5, 3)]
    #[case(15, 5, 3)]
    #[case(16, 5, 4)]
    fn counts_pages(#[case] total: u64, #[case] size: u32, #[case] expected: u64) {
        assert_eq!(page_count(total, size), expected);
    }

    #[rstest]
    fn first_page_links_forward_only(base: Url) {
        let request = PageRequest::new(1, 5).expect("request");
        let page = Page::build(vec![1, 2, 3, 4, 5], 12, request, &base).expect("page");

        assert_eq!(page.count, 12);
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/v1/recipes?limit=5&page=2")
        );
        assert!(page.previous.is_none());
    }

    #[rstest]
    fn second_page_previous_link_drops_page_param(base: Url) {
        let request = PageRequest::new(2, 5).expect("request");
        let page = Page::build(vec![6, 7, 8, 9, 10], 12, request, &base).expect("page");

        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/v1/recipes?limit=5")
        );
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/v1/recipes?limit=5&page=3")
        );
    }

    #[rstest]
    fn last_page_has_no_next_link() {
        let url = Url::parse("http://testserver/api/v1/recipes?page=3&limit=5&tags=lunch")
            .expect("valid url");
        let request = PageRequest::new(3, 5).expect("request");
        let page = Page::build(vec![11, 12], 12, request, &url).expect("page");

        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/v1/recipes?limit=5&tags=lunch&page=2")
        );
    }

    #[rstest]
    fn previous_link_without_other_params_has_no_query() {
        let url = Url::parse("http://testserver/api/v1/recipes?page=2").expect("valid url");
        let request = PageRequest::new(2, 6).expect("request");
        let page = Page::build(vec![7], 7, request, &url).expect("page");

        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/v1/recipes")
        );
    }

    #[rstest]
    fn empty_collection_has_blank_first_page(base: Url) {
        let request = PageRequest::new(1, 5).expect("request");
        let page = Page::<u8>::build(Vec::new(), 0, request, &base).expect("page");

        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[rstest]
    fn rejects_page_beyond_last(base: Url) {
        let request = PageRequest::new(4, 5).expect("request");
        let err = Page::<u8>::build(Vec::new(), 12, request, &base).expect_err("out of range");
        assert_eq!(err, PaginationError::PageOutOfRange { page: 4, last: 3 });
    }

    #[rstest]
    fn serialises_envelope_fields(base: Url) {
        let request = PageRequest::new(1, 5).expect("request");
        let page = Page::build(vec!["a"], 1, request, &base)
            .expect("page")
            .map(str::to_uppercase);
        let value = serde_json::to_value(&page).expect("serialise");

        assert_eq!(
            value,
            serde_json::json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": ["A"],
            })
        );
    }
}
