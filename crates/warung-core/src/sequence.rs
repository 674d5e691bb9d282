//! # Business Days & Transaction Numbering
//!
//! A transaction number is the UTC calendar day followed by a per-tenant
//! daily sequence:
//!
//! ```text
//! 20260807 0001
//! └──┬───┘ └─┬┘
//! day key   sequence (1-based, zero-padded to 4, resets each day)
//! ```
//!
//! The fixed-width day-then-sequence encoding makes lexicographic range
//! comparison on the first eight characters equivalent to chronological
//! comparison, which is how all report date filtering works: a transaction
//! always reports under the day it was *numbered* for, independent of
//! clock skew at read time.
//!
//! The sequence field widens naturally past 9999 (the `{:04}` pad is a
//! minimum width). The day prefix keeps its fixed width, so day-keyed
//! filtering and per-tenant uniqueness survive; lexicographic ordering
//! *within* such a day is no longer total.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;

/// Width of the `YYYYMMDD` day key prefix.
pub const DAY_KEY_LEN: usize = 8;

/// Minimum width of the zero-padded daily sequence.
pub const SEQUENCE_PAD: usize = 4;

// =============================================================================
// Day Keys
// =============================================================================

/// The `YYYYMMDD` key for a calendar date.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The business day (UTC calendar date) of a timestamp.
pub fn business_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Parses a `YYYY-MM-DD` request parameter into a day key.
pub fn day_key_from_date_str(value: &str) -> Result<String, ValidationError> {
    let date =
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("expected YYYY-MM-DD: {e}"),
        })?;
    Ok(day_key(date))
}

/// Renders a `YYYYMMDD` day key back to `YYYY-MM-DD` for display.
///
/// Keys always come from [`day_key`] or the schema, so the width is fixed.
pub fn date_str_from_day_key(key: &str) -> String {
    if key.len() == DAY_KEY_LEN {
        format!("{}-{}-{}", &key[..4], &key[4..6], &key[6..8])
    } else {
        key.to_string()
    }
}

// =============================================================================
// Transaction Numbers
// =============================================================================

/// Formats a transaction number from a day key and a 1-based sequence.
///
/// The pad is a minimum width: sequence 10000 produces a 13-character
/// number rather than wrapping or colliding.
pub fn transaction_number(day_key: &str, sequence: i64) -> String {
    format!("{day_key}{sequence:0width$}", width = SEQUENCE_PAD)
}

/// The day-key prefix of a transaction number.
pub fn day_key_of(transaction_number: &str) -> &str {
    if transaction_number.len() >= DAY_KEY_LEN {
        &transaction_number[..DAY_KEY_LEN]
    } else {
        transaction_number
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(day_key(date), "20260807");
    }

    #[test]
    fn test_day_key_from_date_str() {
        assert_eq!(day_key_from_date_str("2026-08-07").unwrap(), "20260807");
        assert!(day_key_from_date_str("2026/08/07").is_err());
        assert!(day_key_from_date_str("20260807").is_err());
        assert!(day_key_from_date_str("2026-13-01").is_err());
    }

    #[test]
    fn test_date_str_round_trip() {
        assert_eq!(date_str_from_day_key("20260807"), "2026-08-07");
    }

    #[test]
    fn test_transaction_number_padding() {
        assert_eq!(transaction_number("20260807", 1), "202608070001");
        assert_eq!(transaction_number("20260807", 42), "202608070042");
        assert_eq!(transaction_number("20260807", 9999), "202608079999");
    }

    #[test]
    fn test_transaction_number_widens_past_9999() {
        // The width grows instead of wrapping; no collision with sequence 1.
        assert_eq!(transaction_number("20260807", 10_000), "2026080710000");
        assert_ne!(
            transaction_number("20260807", 10_000),
            transaction_number("20260807", 1000)
        );
    }

    #[test]
    fn test_day_key_of() {
        assert_eq!(day_key_of("202608070001"), "20260807");
        assert_eq!(day_key_of("2026080710000"), "20260807");
        assert_eq!(day_key_of("short"), "short");
    }

    #[test]
    fn test_lexicographic_order_matches_chronology() {
        // Fixed-width day prefix: string comparison == date comparison.
        let a = transaction_number("20260807", 9999);
        let b = transaction_number("20260808", 1);
        assert!(a < b);
    }
}
