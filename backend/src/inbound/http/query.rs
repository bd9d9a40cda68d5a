//! Query string access and page envelope helpers.
//!
//! `serde_urlencoded` cannot collect repeated keys such as `tags=a&tags=b`,
//! so listings read the raw pairs instead of deserialising a struct.

use actix_web::HttpRequest;
use pagination::{
    LIMIT_QUERY_PARAM, PAGE_QUERY_PARAM, Page, PageRequest, PageSizePolicy, PaginationError,
};
use serde_json::json;
use url::form_urlencoded;

use crate::domain::{Error, Paged};

/// Decoded query string pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode a raw query string.
    ///
    /// # Examples
    /// ```
    /// use recipes_backend::inbound::http::query::QueryParams;
    ///
    /// let params = QueryParams::parse("tags=lunch&tags=dinner&limit=5");
    /// assert_eq!(params.all("tags"), vec!["lunch", "dinner"]);
    /// assert_eq!(params.first("limit"), Some("5"));
    /// assert_eq!(params.first("page"), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Query parameters of `req`.
    #[must_use]
    pub fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    /// First value for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `key`, in request order.
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

pub(crate) fn pagination_error(error: &PaginationError) -> Error {
    match error {
        PaginationError::InvalidLimit { value } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "field": LIMIT_QUERY_PARAM,
                "value": value,
                "code": "invalid_limit",
            }))
        }
        PaginationError::InvalidPage { value } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "field": PAGE_QUERY_PARAM,
                "value": value,
                "code": "invalid_page",
            }))
        }
        PaginationError::PageOutOfRange { page, last } => Error::not_found("invalid page")
            .with_details(json!({ "page": page, "last": last })),
        PaginationError::InvalidPolicy { .. } => Error::internal(error.to_string()),
    }
}

/// Page coordinates from `page` and `limit` under `policy`.
pub(crate) fn page_request(
    params: &QueryParams,
    policy: &PageSizePolicy,
) -> Result<PageRequest, Error> {
    PageRequest::from_query(
        policy,
        params.first(PAGE_QUERY_PARAM),
        params.first(LIMIT_QUERY_PARAM),
    )
    .map_err(|err| pagination_error(&err))
}

/// Wrap a domain page in the response envelope, linking relative to `req`.
pub(crate) fn page_envelope<T, U>(
    req: &HttpRequest,
    paged: Paged<T>,
    request: PageRequest,
    render: impl FnMut(T) -> U,
) -> Result<Page<U>, Error> {
    let Paged { total, items } = paged;
    Page::build(items, total, request, &req.full_url())
        .map(|page| page.map(render))
        .map_err(|err| pagination_error(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("limit=abc", ErrorCode::InvalidRequest)]
    #[case("limit=0", ErrorCode::InvalidRequest)]
    #[case("limit=-3", ErrorCode::InvalidRequest)]
    #[case("page=first", ErrorCode::InvalidRequest)]
    fn malformed_pagination_is_a_bad_request(#[case] query: &str, #[case] expected: ErrorCode) {
        let err = page_request(&QueryParams::parse(query), &PageSizePolicy::default())
            .expect_err("rejected");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn oversized_limit_is_clamped() {
        let policy = PageSizePolicy::new(6, 20).expect("policy");
        let request =
            page_request(&QueryParams::parse("limit=500"), &policy).expect("valid request");
        assert_eq!(request.page_size(), 20);
    }

    #[rstest]
    fn page_beyond_the_last_is_not_found() {
        let req = TestRequest::get()
            .uri("/api/v1/recipes?page=3&limit=5")
            .to_http_request();
        let request = PageRequest::new(3, 5).expect("request");
        let paged = Paged {
            total: 7,
            items: Vec::<u8>::new(),
        };
        let err = page_envelope(&req, paged, request, |item| item).expect_err("out of range");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "invalid page");
    }

    #[rstest]
    fn envelope_links_keep_filters() {
        let req = TestRequest::get()
            .uri("/api/v1/recipes?tags=lunch&limit=2")
            .to_http_request();
        let request = PageRequest::new(1, 2).expect("request");
        let paged = Paged {
            total: 3,
            items: vec![1, 2],
        };
        let page = page_envelope(&req, paged, request, |item| item * 10).expect("page");
        assert_eq!(page.results, vec![10, 20]);
        let next = page.next.expect("next link");
        assert!(next.ends_with("/api/v1/recipes?tags=lunch&limit=2&page=2"), "{next}");
    }
}
