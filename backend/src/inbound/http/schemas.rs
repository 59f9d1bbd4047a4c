//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework agnostic and never derive `ToSchema`. The
//! wrappers here mirror their shape so utoipa can register them under the
//! domain names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The referenced student or recognition does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The sender does not hold enough sendable credits.
    #[schema(rename = "insufficient_balance")]
    InsufficientBalance,
    /// The transfer would exceed the monthly sending cap.
    #[schema(rename = "sending_limit_exceeded")]
    SendingLimitExceeded,
    /// The student does not hold enough redeemable credits.
    #[schema(rename = "insufficient_redeemable")]
    InsufficientRedeemable,
    /// The endorser already endorsed this recognition.
    #[schema(rename = "duplicate_endorsement")]
    DuplicateEndorsement,
    /// The ledger store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "sending_limit_exceeded")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "monthly sending limit exceeded: 90 sent, 20 requested")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
