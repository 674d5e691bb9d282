//! # Error Types
//!
//! Domain-specific error types for warung-core.
//!
//! ## Error Layering
//! ```text
//! ValidationError ──► CoreError ──► (warung-db) DbError ──► (api) ApiError
//! ```
//!
//! Every variant here corresponds to a condition a caller can act on;
//! infrastructure failures live in the persistence layer's error type.

use thiserror::Error;

use crate::money::Money;
use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and domain logic failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item missing for this tenant, or soft-deleted.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Transaction missing for this tenant.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Checkout submitted with no cart entries.
    #[error("Cart must not be empty")]
    EmptyCart,

    /// Payment method outside the accepted set.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Cash tendered below the transaction total.
    #[error("Insufficient payment: tendered {tendered}, total {total}")]
    InsufficientPayment { total: Money, tendered: Money },

    /// Void requested on a transaction that is already voided.
    #[error("Transaction {0} is already voided")]
    AlreadyVoided(String),

    /// Caller's role does not allow the operation.
    #[error("Operation requires the {required:?} role")]
    PermissionDenied { required: Role },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPayment {
            total: Money::new(30_000),
            tendered: Money::new(20_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: tendered Rp 20.000, total Rp 30.000"
        );

        let err = CoreError::AlreadyVoided("tx-1".to_string());
        assert_eq!(err.to_string(), "Transaction tx-1 is already voided");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reason".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
