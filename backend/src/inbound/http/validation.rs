//! Shared validation helpers for inbound HTTP adapters.
//!
//! Handlers only check request shape here. Ledger rules, including the
//! ordering of business checks, stay in the domain service.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use serde_json::{Value, json};

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidInteger,
    UnsupportedContentType,
    MalformedBody,
    PayloadTooLarge,
    UnreadableBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::UnsupportedContentType => "unsupported_content_type",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::PayloadTooLarge => "payload_too_large",
            ErrorCode::UnreadableBody => "unreadable_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: Value) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_integer_error(field: FieldName, value: Value) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be integer"))
        .with_value(ErrorCode::InvalidInteger, value)
}

/// Unwrap a required field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a JSON integer or a string holding one.
///
/// Fractional numbers and non-numeric strings are rejected; surrounding
/// whitespace in strings is ignored.
pub(crate) fn parse_integer(value: Value, field: FieldName) -> Result<i64, Error> {
    let parsed = match &value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid_integer_error(field, value))
}

/// Parse a required integer field.
pub(crate) fn parse_required_integer(
    value: Option<Value>,
    field: FieldName,
) -> Result<i64, Error> {
    match value {
        None | Some(Value::Null) => Err(missing_field_error(field)),
        Some(raw) => parse_integer(raw, field),
    }
}

fn body_error(message: &str, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

/// Translate a JSON extractor failure into an `invalid_request` error.
pub(crate) fn json_payload_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::ContentType => body_error(
            "request body must be JSON (Content-Type: application/json)",
            ErrorCode::UnsupportedContentType,
        ),
        JsonPayloadError::Deserialize(source) => {
            Error::invalid_request("request body does not match the expected shape").with_details(
                json!({
                    "code": ErrorCode::MalformedBody.as_str(),
                    "reason": source.to_string(),
                    "line": source.line(),
                    "column": source.column(),
                }),
            )
        }
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            body_error("request body is too large", ErrorCode::PayloadTooLarge)
        }
        _ => body_error("request body could not be read", ErrorCode::UnreadableBody),
    }
}

/// Translate a query-string extractor failure into an `invalid_request` error.
pub(crate) fn query_payload_error(err: &QueryPayloadError) -> Error {
    let reason = match err {
        QueryPayloadError::Deserialize(source) => source.to_string(),
        other => other.to_string(),
    };
    Error::invalid_request("query string is malformed").with_details(json!({
        "code": ErrorCode::MalformedQuery.as_str(),
        "reason": reason,
    }))
}

/// Path segments that fail to parse can never name a stored record.
pub(crate) fn path_error(err: &PathError) -> Error {
    Error::not_found("resource not found").with_details(json!({ "reason": err.to_string() }))
}

pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    json_payload_error(&err).into()
}

pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    query_payload_error(&err).into()
}

pub(crate) fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    path_error(&err).into()
}
