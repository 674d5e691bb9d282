//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All amounts are whole rupiah stored as `i64`. The rupiah has no
//! fractional minor unit in day-to-day trade, so the smallest unit IS the
//! integer amount: `Money::new(15000)` is Rp 15.000. Floating point never
//! enters the picture - the database, calculations, and API all carry the
//! same integer.
//!
//! ## Usage
//! ```rust
//! use warung_core::money::Money;
//!
//! let price = Money::new(15_000);
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.amount(), 30_000);
//! assert_eq!(line_total.to_string(), "Rp 30.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// - **i64 (signed)**: allows negative values for differences and audits
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a bare integer on the wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a whole-rupiah amount.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the raw amount in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is strictly negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity to produce a line total.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the amount as a localized rupiah string: `Rp 1.234.567`.
    ///
    /// Thousands groups are separated with `.` and there are no decimals.
    /// Negative amounts render as `-Rp 500`.
    pub fn format_rupiah(&self) -> String {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();

        // Insert a separator before every group of three digits from the right.
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if negative {
            format!("-Rp {}", grouped)
        } else {
            format!("Rp {}", grouped)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_rupiah())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<i64> for Money {
    #[inline]
    fn from(amount: i64) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_amount() {
        let m = Money::new(15_000);
        assert_eq!(m.amount(), 15_000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(30_000);
        let b = Money::new(10_000);

        assert_eq!((a + b).amount(), 40_000);
        assert_eq!((a - b).amount(), 20_000);
        assert_eq!(b.multiply_quantity(3).amount(), 30_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::new(1_000), Money::new(2_500), Money::new(500)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), 4_000);
    }

    #[test]
    fn test_format_rupiah_grouping() {
        assert_eq!(Money::new(0).format_rupiah(), "Rp 0");
        assert_eq!(Money::new(500).format_rupiah(), "Rp 500");
        assert_eq!(Money::new(15_000).format_rupiah(), "Rp 15.000");
        assert_eq!(Money::new(1_234_567).format_rupiah(), "Rp 1.234.567");
        assert_eq!(Money::new(100_000_000).format_rupiah(), "Rp 100.000.000");
    }

    #[test]
    fn test_format_rupiah_negative() {
        assert_eq!(Money::new(-500).format_rupiah(), "-Rp 500");
        assert_eq!(Money::new(-15_000).format_rupiah(), "-Rp 15.000");
    }

    #[test]
    fn test_display_matches_format() {
        assert_eq!(format!("{}", Money::new(30_000)), "Rp 30.000");
    }

    #[test]
    fn test_serde_transparent() {
        let m = Money::new(12_345);
        assert_eq!(serde_json::to_string(&m).unwrap(), "12345");
        let back: Money = serde_json::from_str("12345").unwrap();
        assert_eq!(back, m);
    }
}
