//! # API Error Type
//!
//! Unified error type for the HTTP boundary.
//!
//! Every error carries a machine-readable `code` and a human-readable
//! `message`, serialized as:
//!
//! ```json
//! { "code": "INSUFFICIENT_PAYMENT", "message": "Insufficient payment: ..." }
//! ```
//!
//! Each code maps to a distinct HTTP status. Raw persistence errors are
//! logged here and replaced with a generic message - internal state never
//! crosses the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use warung_core::CoreError;
use warung_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,
}

/// Error codes for API responses, one per domain error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid credential (401).
    Unauthenticated,

    /// Role insufficient for an owner-only operation (403).
    PermissionDenied,

    /// Item/transaction/record absent for this tenant (404).
    NotFound,

    /// Malformed input: empty cart, bad quantity, unknown payment
    /// method, missing void reason (400).
    InvalidArgument,

    /// Cash tendered below the transaction total (422).
    InsufficientPayment,

    /// Illegal state transition, e.g. voiding an already-voided
    /// transaction (409).
    InvalidState,

    /// Persistence unavailable or contention exceeded the retry
    /// budget (500).
    Infrastructure,
}

impl ErrorCode {
    /// The HTTP status this code maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientPayment => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidState => StatusCode::CONFLICT,
            ErrorCode::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidArgument, message)
    }

    /// Creates an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidState, message)
    }

    /// Creates an infrastructure error with a sanitized message.
    pub fn infrastructure() -> Self {
        ApiError::new(ErrorCode::Infrastructure, "Service temporarily unavailable")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ItemNotFound(_) | CoreError::TransactionNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::EmptyCart
            | CoreError::UnknownPaymentMethod(_)
            | CoreError::Validation(_) => ApiError::new(ErrorCode::InvalidArgument, err.to_string()),
            CoreError::InsufficientPayment { .. } => {
                ApiError::new(ErrorCode::InsufficientPayment, err.to_string())
            }
            CoreError::AlreadyVoided(_) => ApiError::new(ErrorCode::InvalidState, err.to_string()),
            CoreError::PermissionDenied { .. } => {
                ApiError::new(ErrorCode::PermissionDenied, err.to_string())
            }
        }
    }
}

/// Converts database errors to API errors.
///
/// Anything that isn't a clean not-found/duplicate is an infrastructure
/// failure: the detail is logged, the client gets a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value: _ } => {
                ApiError::invalid_argument(format!("{field} already exists"))
            }
            other => {
                tracing::error!(error = %other, "Database failure");
                ApiError::infrastructure()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warung_core::{types::Role, Money};

    #[test]
    fn test_status_mapping_is_distinct() {
        let codes = [
            ErrorCode::Unauthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::NotFound,
            ErrorCode::InvalidArgument,
            ErrorCode::InsufficientPayment,
            ErrorCode::InvalidState,
            ErrorCode::Infrastructure,
        ];
        let statuses: std::collections::HashSet<_> =
            codes.iter().map(|c| c.status().as_u16()).collect();
        assert_eq!(statuses.len(), codes.len());
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InsufficientPayment {
            total: Money::new(30_000),
            tendered: Money::new(20_000),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);

        let err: ApiError = CoreError::AlreadyVoided("tx".to_string()).into();
        assert_eq!(err.code, ErrorCode::InvalidState);

        let err: ApiError = CoreError::PermissionDenied {
            required: Role::Owner,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_db_error_detail_not_leaked() {
        let err: ApiError = DbError::QueryFailed("secret table layout".to_string()).into();
        assert_eq!(err.code, ErrorCode::Infrastructure);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::invalid_argument("Cart must not be empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_ARGUMENT");
        assert_eq!(json["message"], "Cart must not be empty");
    }
}
