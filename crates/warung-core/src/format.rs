//! # Report Formatting
//!
//! Rendering of aggregated results into their final reporting shapes.
//! Currency strings live on [`crate::money::Money::format_rupiah`]; this
//! module renders export rows as delimited text.
//!
//! The header is the stable field set of [`ExportRow`]; an empty row
//! sequence produces an empty table (empty string), not an error. Fields
//! containing the delimiter, quotes, or newlines are quoted with doubled
//! inner quotes, so line lists like `"Kopi x2, Teh x1"` survive a round
//! trip through any spreadsheet import.

use crate::report::ExportRow;

const DELIMITER: char = ',';

/// Renders export rows as comma-delimited text with a header line.
///
/// Lines are terminated with `\r\n` per the usual delimited-text
/// convention.
pub fn render_delimited(rows: &[ExportRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_record(
        &mut out,
        ExportRow::HEADER.iter().map(|h| h.to_string()),
    );
    for row in rows {
        push_record(&mut out, row.values().into_iter());
    }
    out
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(DELIMITER);
        }
        first = false;
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

/// Quotes a field when it contains the delimiter, a quote, or a newline.
fn escape_field(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn row(number: &str, items: &str, total: i64) -> ExportRow {
        ExportRow {
            transaction_number: number.to_string(),
            date: "2026-08-07".to_string(),
            time: "09:30:00".to_string(),
            items: items.to_string(),
            total: Money::new(total),
            payment_method: "cash".to_string(),
            status: "completed".to_string(),
            cashier: "Budi".to_string(),
        }
    }

    #[test]
    fn test_empty_rows_render_empty_table() {
        assert_eq!(render_delimited(&[]), "");
    }

    #[test]
    fn test_header_and_row() {
        let out = render_delimited(&[row("202608070001", "Kopi x2", 30_000)]);
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            "transaction_number,date,time,items,total,payment_method,status,cashier"
        );
        assert_eq!(
            lines.next().unwrap(),
            "202608070001,2026-08-07,09:30:00,Kopi x2,30000,cash,completed,Budi"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_field_with_delimiter_is_quoted() {
        let out = render_delimited(&[row("202608070001", "Kopi x2, Teh x1", 40_000)]);
        assert!(out.contains("\"Kopi x2, Teh x1\""));
    }

    #[test]
    fn test_field_with_quote_is_doubled() {
        let mut r = row("202608070001", "Kopi x2", 30_000);
        r.cashier = "Budi \"Bud\"".to_string();
        let out = render_delimited(&[r]);
        assert!(out.contains("\"Budi \"\"Bud\"\"\""));
    }

    #[test]
    fn test_one_line_per_row() {
        let rows = vec![
            row("202608070001", "Kopi x1", 15_000),
            row("202608070002", "Teh x1", 10_000),
        ];
        let out = render_delimited(&rows);
        assert_eq!(out.lines().count(), 3); // header + 2 rows
    }
}
