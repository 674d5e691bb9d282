//! # Settlement Rules
//!
//! Payment-method-specific settlement, applied at checkout before anything
//! is persisted.
//!
//! ## Rules
//! - **Cash**: the tendered amount must cover the total, otherwise the
//!   checkout fails with [`CoreError::InsufficientPayment`]. Change is
//!   `tendered - total`.
//! - **Qris / Transfer**: exact settlement is assumed. A tendered amount
//!   below the total is silently raised to the total (a normalization,
//!   not an error - the terminal charged the exact amount regardless of
//!   what the cashier typed). Change is always zero.

use crate::error::CoreError;
use crate::money::Money;
use crate::types::PaymentMethod;

/// Outcome of applying settlement rules to a tendered payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// The payment amount actually recorded.
    pub payment_amount: Money,
    /// Change returned to the customer.
    pub change_amount: Money,
}

/// Applies the method's settlement rule to a tendered amount.
pub fn settle(
    method: PaymentMethod,
    total: Money,
    tendered: Money,
) -> Result<Settlement, CoreError> {
    match method {
        PaymentMethod::Cash => {
            if tendered < total {
                return Err(CoreError::InsufficientPayment { total, tendered });
            }
            Ok(Settlement {
                payment_amount: tendered,
                change_amount: tendered - total,
            })
        }
        PaymentMethod::Qris | PaymentMethod::Transfer => Ok(Settlement {
            // Under-tender is normalized up to the exact total.
            payment_amount: if tendered < total { total } else { tendered },
            change_amount: Money::zero(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_below_total_rejected() {
        let err = settle(PaymentMethod::Cash, Money::new(30_000), Money::new(25_000));
        assert!(matches!(
            err,
            Err(CoreError::InsufficientPayment { total, tendered })
                if total.amount() == 30_000 && tendered.amount() == 25_000
        ));
    }

    #[test]
    fn test_cash_exact_yields_zero_change() {
        let s = settle(PaymentMethod::Cash, Money::new(30_000), Money::new(30_000)).unwrap();
        assert_eq!(s.payment_amount.amount(), 30_000);
        assert_eq!(s.change_amount.amount(), 0);
    }

    #[test]
    fn test_cash_over_yields_change() {
        let s = settle(PaymentMethod::Cash, Money::new(30_000), Money::new(35_000)).unwrap();
        assert_eq!(s.payment_amount.amount(), 35_000);
        assert_eq!(s.change_amount.amount(), 5_000);
    }

    #[test]
    fn test_electronic_under_tender_normalized() {
        for method in [PaymentMethod::Qris, PaymentMethod::Transfer] {
            let s = settle(method, Money::new(30_000), Money::new(0)).unwrap();
            assert_eq!(s.payment_amount.amount(), 30_000);
            assert_eq!(s.change_amount.amount(), 0);
        }
    }

    #[test]
    fn test_electronic_never_returns_change() {
        let s = settle(PaymentMethod::Qris, Money::new(30_000), Money::new(40_000)).unwrap();
        assert_eq!(s.payment_amount.amount(), 40_000);
        assert_eq!(s.change_amount.amount(), 0);
    }
}
