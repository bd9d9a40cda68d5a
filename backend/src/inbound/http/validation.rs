//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every malformed query or path value becomes an `invalid_request` error
//! whose details name the field, echo the raw value and carry a stable code.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::json;

use crate::domain::{Error, parse_filter_flag};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidInteger,
    InvalidFlag,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidFlag => "invalid_flag",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_integer_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    invalid_value(
        field,
        format!("{name} must be an integer"),
        ErrorCode::InvalidInteger,
        value,
    )
}

pub(crate) fn invalid_flag_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    invalid_value(
        field,
        format!("{name} must be one of 1, 0, true, false"),
        ErrorCode::InvalidFlag,
        value,
    )
}

/// Parse an integer-backed identifier from a query value.
pub(crate) fn parse_query_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| invalid_integer_error(field, value))
}

/// Parse a path identifier; a non-integer segment addresses nothing.
pub(crate) fn parse_path_id<T: FromStr>(value: &str, resource: &'static str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| Error::not_found(format!("{resource} not found")))
}

pub(crate) fn parse_flag(value: &str, field: FieldName) -> Result<bool, Error> {
    parse_filter_flag(value).ok_or_else(|| invalid_flag_error(field, value))
}

/// Parse a non-negative count such as `recipes_limit`.
pub(crate) fn parse_count(value: &str, field: FieldName) -> Result<u32, Error> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid_integer_error(field, value))
}

/// JSON extractor configuration rendering body errors as `invalid_request`.
///
/// Wrong field types, malformed JSON and a missing content type all surface
/// through the domain error envelope instead of Actix's plain-text default.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid JSON body: {inner}"),
        other => format!("unreadable request body: {other}"),
    };
    Error::invalid_request(message).into()
}
