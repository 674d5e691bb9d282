//! # Validation Module
//!
//! Input validation for checkout and catalog administration.
//!
//! Validation runs in full before any persistence: a failing cart aborts
//! the whole checkout with no partial lines written.

use crate::error::ValidationError;
use crate::types::CartEntry;
use crate::{MAX_CART_ITEMS, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the shape of a cart: bounded size, every quantity legal.
///
/// Emptiness is a domain error ([`crate::error::CoreError::EmptyCart`])
/// raised by the ledger, not here, so the error taxonomy stays distinct.
pub fn validate_cart(entries: &[CartEntry]) -> ValidationResult<()> {
    if entries.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for entry in entries {
        validate_quantity(entry.qty)?;
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a unit price. Free items are not sellable, so zero is rejected.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Void / Misc Validators
// =============================================================================

/// Validates a void reason: required and non-empty after trimming.
pub fn validate_void_reason(reason: &str) -> ValidationResult<()> {
    if reason.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(())
}

/// Validates a password for account activation / change.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 6 {
        return Err(ValidationError::OutOfRange {
            field: "password".to_string(),
            min: 6,
            max: 128,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(qty: i64) -> CartEntry {
        CartEntry {
            item_id: "item-1".to_string(),
            qty,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_cart() {
        assert!(validate_cart(&[entry(1), entry(3)]).is_ok());
        assert!(validate_cart(&[entry(1), entry(0)]).is_err());

        let oversized: Vec<CartEntry> = (0..101).map(|_| entry(1)).collect();
        assert!(validate_cart(&oversized).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Es Teh Manis").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(15_000).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_void_reason() {
        assert!(validate_void_reason("wrong item").is_ok());
        assert!(validate_void_reason("").is_err());
        assert!(validate_void_reason("   ").is_err());
        assert!(validate_void_reason(&"x".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(200)).is_err());
    }
}
