//! # Report Aggregation
//!
//! Pure aggregation over ledger rows. The persistence layer fetches the
//! day-key-filtered transactions (lines included); everything here is
//! deterministic math over that slice, recomputed on every request so a
//! report is always consistent with the ledger as of the read.
//!
//! ## Views
//! - [`summarize`] - range summary: **completed transactions only**.
//!   Voided transactions are excluded from every figure.
//! - [`daily_detail`] - one day's audit view: voided transactions are
//!   deliberately included, separated out with their own count and amount.
//! - [`dashboard`] - today's counters, top items ranked by **quantity**
//!   (the summary ranks by **revenue**: "what sells most" vs "what earns
//!   most" are different questions).
//! - [`export_rows`] - one flattened row per transaction, both statuses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::sequence::date_str_from_day_key;
use crate::types::{Transaction, TransactionStatus};
use crate::{TOP_ITEMS_BY_QUANTITY, TOP_ITEMS_BY_REVENUE};

// =============================================================================
// Report Types
// =============================================================================

/// Inclusive date window of a report, as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: String,
    pub end_date: String,
}

/// Count + amount for one payment method.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MethodBreakdown {
    pub count: i64,
    pub amount: Money,
}

/// Aggregated sales of one catalog item over a report window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSales {
    pub name: String,
    pub qty: i64,
    pub revenue: Money,
}

/// Per-day bucket inside a summary report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DailyBucket {
    pub transactions: i64,
    pub amount: Money,
}

/// Headline figures of a summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_sales: Money,
    pub total_sales_formatted: String,
    pub total_transactions: i64,
    pub total_items_sold: i64,
    /// Integer average (total / count), zero for an empty window.
    pub avg_transaction: Money,
}

/// Range summary over completed transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub period: ReportPeriod,
    pub summary: SummaryTotals,
    /// Keyed by payment method name; only methods actually used appear.
    pub payment_breakdown: BTreeMap<String, MethodBreakdown>,
    /// Top items by revenue, at most [`TOP_ITEMS_BY_REVENUE`].
    pub top_items: Vec<ItemSales>,
    /// Keyed by `YYYY-MM-DD`, ordered chronologically.
    pub daily_sales: BTreeMap<String, DailyBucket>,
}

/// Headline figures of a single-day audit view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTotals {
    pub total_sales: Money,
    pub total_sales_formatted: String,
    /// Completed transactions only.
    pub total_transactions: i64,
    /// Voided transactions, counted separately.
    pub total_voided: i64,
    /// Sum of voided totals (preserved figures, for audit).
    pub voided_amount: Money,
}

/// One day's detail: headline split by status plus the full record list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyDetailReport {
    pub date: String,
    pub summary: DailyTotals,
    /// Every transaction numbered for this day, both statuses.
    pub transactions: Vec<Transaction>,
}

/// Today's dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub date: String,
    pub total_sales: Money,
    pub total_sales_formatted: String,
    pub total_transactions: i64,
    pub total_items_sold: i64,
    /// Top items by quantity sold, at most [`TOP_ITEMS_BY_QUANTITY`].
    pub top_items: Vec<ItemSales>,
}

/// One flattened export row. Field order matches [`ExportRow::HEADER`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub transaction_number: String,
    pub date: String,
    pub time: String,
    /// Lines joined as `"Name x2, Other x1"`.
    pub items: String,
    pub total: Money,
    pub payment_method: String,
    pub status: String,
    pub cashier: String,
}

impl ExportRow {
    /// Stable header for delimited-text rendering.
    pub const HEADER: [&'static str; 8] = [
        "transaction_number",
        "date",
        "time",
        "items",
        "total",
        "payment_method",
        "status",
        "cashier",
    ];

    /// Field values in header order.
    pub fn values(&self) -> [String; 8] {
        [
            self.transaction_number.clone(),
            self.date.clone(),
            self.time.clone(),
            self.items.clone(),
            self.total.amount().to_string(),
            self.payment_method.clone(),
            self.status.clone(),
            self.cashier.clone(),
        ]
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the range summary over completed transactions.
pub fn summarize(period: ReportPeriod, transactions: &[Transaction]) -> SummaryReport {
    let completed: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_completed()).collect();

    let total_sales: Money = completed.iter().map(|t| t.total).sum();
    let total_transactions = completed.len() as i64;

    let mut payment_breakdown: BTreeMap<String, MethodBreakdown> = BTreeMap::new();
    let mut daily_sales: BTreeMap<String, DailyBucket> = BTreeMap::new();
    let mut item_sales: BTreeMap<String, ItemSales> = BTreeMap::new();
    let mut total_items_sold = 0_i64;

    for tx in &completed {
        let method = payment_breakdown
            .entry(tx.payment_method.as_str().to_string())
            .or_default();
        method.count += 1;
        method.amount += tx.total;

        let bucket = daily_sales
            .entry(date_str_from_day_key(tx.day_key()))
            .or_default();
        bucket.transactions += 1;
        bucket.amount += tx.total;

        for line in &tx.lines {
            let entry = item_sales
                .entry(line.name.clone())
                .or_insert_with(|| ItemSales {
                    name: line.name.clone(),
                    qty: 0,
                    revenue: Money::zero(),
                });
            entry.qty += line.quantity;
            entry.revenue += line.line_total;
            total_items_sold += line.quantity;
        }
    }

    let top_items = rank_by_revenue(item_sales, TOP_ITEMS_BY_REVENUE);

    let avg_transaction = if total_transactions > 0 {
        Money::new(total_sales.amount() / total_transactions)
    } else {
        Money::zero()
    };

    SummaryReport {
        period,
        summary: SummaryTotals {
            total_sales,
            total_sales_formatted: total_sales.format_rupiah(),
            total_transactions,
            total_items_sold,
            avg_transaction,
        },
        payment_breakdown,
        top_items,
        daily_sales,
    }
}

/// Builds the single-day audit view: voided transactions listed and
/// counted separately, completed totals unchanged by them.
pub fn daily_detail(date: String, transactions: Vec<Transaction>) -> DailyDetailReport {
    let mut total_sales = Money::zero();
    let mut voided_amount = Money::zero();
    let mut total_transactions = 0_i64;
    let mut total_voided = 0_i64;

    for tx in &transactions {
        match tx.status {
            TransactionStatus::Completed => {
                total_sales += tx.total;
                total_transactions += 1;
            }
            TransactionStatus::Voided => {
                voided_amount += tx.total;
                total_voided += 1;
            }
        }
    }

    DailyDetailReport {
        date,
        summary: DailyTotals {
            total_sales,
            total_sales_formatted: total_sales.format_rupiah(),
            total_transactions,
            total_voided,
            voided_amount,
        },
        transactions,
    }
}

/// Builds today's dashboard from completed transactions, ranking items
/// by quantity sold.
pub fn dashboard(date: String, transactions: &[Transaction]) -> DashboardReport {
    let completed: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_completed()).collect();

    let total_sales: Money = completed.iter().map(|t| t.total).sum();
    let mut item_sales: BTreeMap<String, ItemSales> = BTreeMap::new();
    let mut total_items_sold = 0_i64;

    for tx in &completed {
        for line in &tx.lines {
            let entry = item_sales
                .entry(line.name.clone())
                .or_insert_with(|| ItemSales {
                    name: line.name.clone(),
                    qty: 0,
                    revenue: Money::zero(),
                });
            entry.qty += line.quantity;
            entry.revenue += line.line_total;
            total_items_sold += line.quantity;
        }
    }

    DashboardReport {
        date,
        total_sales,
        total_sales_formatted: total_sales.format_rupiah(),
        total_transactions: completed.len() as i64,
        total_items_sold,
        top_items: rank_by_quantity(item_sales, TOP_ITEMS_BY_QUANTITY),
    }
}

/// Flattens transactions into export rows, one per transaction, voided
/// included. Never aggregates.
pub fn export_rows(transactions: &[Transaction]) -> Vec<ExportRow> {
    transactions
        .iter()
        .map(|tx| ExportRow {
            transaction_number: tx.transaction_number.clone(),
            date: tx.created_at.format("%Y-%m-%d").to_string(),
            time: tx.created_at.format("%H:%M:%S").to_string(),
            items: tx
                .lines
                .iter()
                .map(|l| format!("{} x{}", l.name, l.quantity))
                .collect::<Vec<_>>()
                .join(", "),
            total: tx.total,
            payment_method: tx.payment_method.as_str().to_string(),
            status: tx.status.as_str().to_string(),
            cashier: tx.created_by_name.clone(),
        })
        .collect()
}

// =============================================================================
// Ranking Helpers
// =============================================================================

fn rank_by_revenue(items: BTreeMap<String, ItemSales>, limit: usize) -> Vec<ItemSales> {
    let mut ranked: Vec<ItemSales> = items.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

fn rank_by_quantity(items: BTreeMap<String, ItemSales>, limit: usize) -> Vec<ItemSales> {
    let mut ranked: Vec<ItemSales> = items.into_values().collect();
    ranked.sort_by(|a, b| b.qty.cmp(&a.qty).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, TransactionLine};
    use chrono::{TimeZone, Utc};

    fn line(name: &str, qty: i64, unit_price: i64) -> TransactionLine {
        TransactionLine {
            item_id: format!("item-{name}"),
            name: name.to_string(),
            quantity: qty,
            unit_price: Money::new(unit_price),
            line_total: Money::new(unit_price * qty),
        }
    }

    fn tx(
        number: &str,
        method: PaymentMethod,
        status: TransactionStatus,
        lines: Vec<TransactionLine>,
    ) -> Transaction {
        let total = crate::types::total_of(&lines);
        Transaction {
            id: format!("tx-{number}"),
            tenant_id: "tenant-1".to_string(),
            transaction_number: number.to_string(),
            lines,
            total,
            payment_method: method,
            payment_amount: total,
            change_amount: Money::zero(),
            payment_reference: None,
            status,
            voided_at: None,
            voided_by: None,
            void_reason: None,
            created_by: "u1".to_string(),
            created_by_name: "Budi".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap(),
        }
    }

    fn period() -> ReportPeriod {
        ReportPeriod {
            start_date: "2026-08-07".to_string(),
            end_date: "2026-08-08".to_string(),
        }
    }

    #[test]
    fn test_summary_excludes_voided() {
        let txs = vec![
            tx(
                "202608070001",
                PaymentMethod::Cash,
                TransactionStatus::Completed,
                vec![line("Kopi", 2, 15_000)],
            ),
            tx(
                "202608070002",
                PaymentMethod::Qris,
                TransactionStatus::Voided,
                vec![line("Teh", 1, 10_000)],
            ),
        ];

        let report = summarize(period(), &txs);
        assert_eq!(report.summary.total_sales.amount(), 30_000);
        assert_eq!(report.summary.total_transactions, 1);
        assert_eq!(report.summary.total_items_sold, 2);
        assert!(!report.payment_breakdown.contains_key("qris"));
        assert_eq!(report.payment_breakdown["cash"].count, 1);
        assert_eq!(report.payment_breakdown["cash"].amount.amount(), 30_000);
    }

    #[test]
    fn test_summary_daily_buckets_and_avg() {
        let txs = vec![
            tx(
                "202608070001",
                PaymentMethod::Cash,
                TransactionStatus::Completed,
                vec![line("Kopi", 1, 20_000)],
            ),
            tx(
                "202608070002",
                PaymentMethod::Cash,
                TransactionStatus::Completed,
                vec![line("Kopi", 1, 10_000)],
            ),
            tx(
                "202608080001",
                PaymentMethod::Transfer,
                TransactionStatus::Completed,
                vec![line("Teh", 1, 5_000)],
            ),
        ];

        let report = summarize(period(), &txs);
        assert_eq!(report.summary.avg_transaction.amount(), 35_000 / 3);
        assert_eq!(report.daily_sales.len(), 2);
        assert_eq!(report.daily_sales["2026-08-07"].transactions, 2);
        assert_eq!(report.daily_sales["2026-08-07"].amount.amount(), 30_000);
        assert_eq!(report.daily_sales["2026-08-08"].transactions, 1);
        // BTreeMap keys iterate chronologically.
        let days: Vec<&String> = report.daily_sales.keys().collect();
        assert_eq!(days, vec!["2026-08-07", "2026-08-08"]);
    }

    #[test]
    fn test_summary_empty_window() {
        let report = summarize(period(), &[]);
        assert_eq!(report.summary.total_sales.amount(), 0);
        assert_eq!(report.summary.avg_transaction.amount(), 0);
        assert!(report.top_items.is_empty());
        assert!(report.daily_sales.is_empty());
    }

    #[test]
    fn test_top_items_ranked_by_revenue() {
        // Gorengan sells more units, Kopi earns more revenue.
        let txs = vec![tx(
            "202608070001",
            PaymentMethod::Cash,
            TransactionStatus::Completed,
            vec![line("Gorengan", 10, 2_000), line("Kopi", 3, 15_000)],
        )];

        let report = summarize(period(), &txs);
        assert_eq!(report.top_items[0].name, "Kopi");
        assert_eq!(report.top_items[0].revenue.amount(), 45_000);
        assert_eq!(report.top_items[1].name, "Gorengan");
    }

    #[test]
    fn test_dashboard_ranked_by_quantity() {
        let txs = vec![tx(
            "202608070001",
            PaymentMethod::Cash,
            TransactionStatus::Completed,
            vec![line("Gorengan", 10, 2_000), line("Kopi", 3, 15_000)],
        )];

        let report = dashboard("2026-08-07".to_string(), &txs);
        assert_eq!(report.top_items[0].name, "Gorengan");
        assert_eq!(report.top_items[0].qty, 10);
        assert_eq!(report.total_items_sold, 13);
    }

    #[test]
    fn test_daily_detail_separates_voided() {
        let txs = vec![
            tx(
                "202608070001",
                PaymentMethod::Cash,
                TransactionStatus::Completed,
                vec![line("Kopi", 2, 15_000)],
            ),
            tx(
                "202608070002",
                PaymentMethod::Cash,
                TransactionStatus::Voided,
                vec![line("Teh", 1, 10_000)],
            ),
        ];

        let report = daily_detail("2026-08-07".to_string(), txs);
        assert_eq!(report.summary.total_sales.amount(), 30_000);
        assert_eq!(report.summary.total_transactions, 1);
        assert_eq!(report.summary.total_voided, 1);
        assert_eq!(report.summary.voided_amount.amount(), 10_000);
        // Both statuses stay in the list for audit.
        assert_eq!(report.transactions.len(), 2);
    }

    #[test]
    fn test_export_rows_include_voided() {
        let txs = vec![
            tx(
                "202608070001",
                PaymentMethod::Cash,
                TransactionStatus::Completed,
                vec![line("Kopi", 2, 15_000), line("Teh", 1, 10_000)],
            ),
            tx(
                "202608070002",
                PaymentMethod::Qris,
                TransactionStatus::Voided,
                vec![line("Teh", 1, 10_000)],
            ),
        ];

        let rows = export_rows(&txs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].items, "Kopi x2, Teh x1");
        assert_eq!(rows[0].date, "2026-08-07");
        assert_eq!(rows[0].time, "09:30:00");
        assert_eq!(rows[0].total.amount(), 40_000);
        assert_eq!(rows[1].status, "voided");
        assert_eq!(rows[1].payment_method, "qris");
        assert_eq!(rows[1].cashier, "Budi");
    }
}
