//! # Transaction Repository
//!
//! Ledger persistence: insert, reads, day-key range scans, and the single
//! completed → voided transition.
//!
//! ## Write Shape
//! A transaction and its lines are written in **one SQL transaction**, so
//! no reader ever observes a record whose total disagrees with its lines.
//! The void is **one conditional UPDATE** guarded on the current status,
//! so the transition happens exactly once even under concurrent void
//! requests, and the void metadata lands atomically with it.
//!
//! ## Date Filtering
//! Range reads compare `substr(transaction_number, 1, 8)` - the embedded
//! business-day key - not the wall-clock timestamp. A transaction always
//! reports under the day it was numbered for.

use sqlx::{Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use warung_core::money::Money;
use warung_core::types::{PaymentMethod, Transaction, TransactionLine, TransactionStatus};

// =============================================================================
// Row Types
// =============================================================================

/// A `transactions` row; lines are joined in separately.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    tenant_id: String,
    transaction_number: String,
    total: Money,
    payment_method: PaymentMethod,
    payment_amount: Money,
    change_amount: Money,
    payment_reference: Option<String>,
    status: TransactionStatus,
    voided_at: Option<chrono::DateTime<chrono::Utc>>,
    voided_by: Option<String>,
    void_reason: Option<String>,
    created_by: String,
    created_by_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_transaction(self, lines: Vec<TransactionLine>) -> Transaction {
        Transaction {
            id: self.id,
            tenant_id: self.tenant_id,
            transaction_number: self.transaction_number,
            lines,
            total: self.total,
            payment_method: self.payment_method,
            payment_amount: self.payment_amount,
            change_amount: self.change_amount,
            payment_reference: self.payment_reference,
            status: self.status,
            voided_at: self.voided_at,
            voided_by: self.voided_by,
            void_reason: self.void_reason,
            created_by: self.created_by,
            created_by_name: self.created_by_name,
            created_at: self.created_at,
        }
    }
}

/// A `transaction_lines` row, keyed back to its transaction.
#[derive(Debug, Clone, sqlx::FromRow)]
struct LineRow {
    transaction_id: String,
    item_id: String,
    name: String,
    quantity: i64,
    unit_price: Money,
    line_total: Money,
}

impl From<LineRow> for TransactionLine {
    fn from(row: LineRow) -> Self {
        TransactionLine {
            item_id: row.item_id,
            name: row.name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.line_total,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, tenant_id, transaction_number, total,
    payment_method, payment_amount, change_amount, payment_reference,
    status, voided_at, voided_by, void_reason,
    created_by, created_by_name, created_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for ledger database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Persists a transaction and its lines atomically.
    ///
    /// The record must be fully built (priced lines, settled amounts,
    /// allocated number) before this call; nothing is mutated afterwards
    /// except via [`Self::void`].
    pub async fn insert(&self, tx: &Transaction) -> DbResult<()> {
        debug!(
            id = %tx.id,
            transaction_number = %tx.transaction_number,
            total = %tx.total.amount(),
            "Inserting transaction"
        );

        let mut db_tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, tenant_id, transaction_number, total,
                payment_method, payment_amount, change_amount, payment_reference,
                status, voided_at, voided_by, void_reason,
                created_by, created_by_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&tx.id)
        .bind(&tx.tenant_id)
        .bind(&tx.transaction_number)
        .bind(tx.total)
        .bind(tx.payment_method)
        .bind(tx.payment_amount)
        .bind(tx.change_amount)
        .bind(&tx.payment_reference)
        .bind(tx.status)
        .bind(tx.voided_at)
        .bind(&tx.voided_by)
        .bind(&tx.void_reason)
        .bind(&tx.created_by)
        .bind(&tx.created_by_name)
        .bind(tx.created_at)
        .execute(&mut *db_tx)
        .await?;

        for (position, line) in tx.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (
                    id, transaction_id, item_id, name,
                    quantity, unit_price, line_total, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&tx.id)
            .bind(&line.item_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_total)
            .bind(position as i64)
            .execute(&mut *db_tx)
            .await?;
        }

        db_tx.commit().await?;
        Ok(())
    }

    /// Gets a transaction by id, scoped to its tenant.
    pub async fn get(&self, tenant_id: &str, id: &str) -> DbResult<Option<Transaction>> {
        let row: Option<TransactionRow> = sqlx::query_as::<Sqlite, TransactionRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions WHERE tenant_id = ?1 AND id = ?2"
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let lines = self.lines_for(&row.id).await?;
                Ok(Some(row.into_transaction(lines)))
            }
            None => Ok(None),
        }
    }

    /// Lists transactions newest-first with pagination and an optional
    /// exact business-day filter. Returns `(page, total_count)`.
    pub async fn list(
        &self,
        tenant_id: &str,
        day_key: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Transaction>, i64)> {
        let (rows, total): (Vec<TransactionRow>, i64) = match day_key {
            Some(day) => {
                let rows = sqlx::query_as::<Sqlite, TransactionRow>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS} FROM transactions
                    WHERE tenant_id = ?1 AND substr(transaction_number, 1, 8) = ?2
                    ORDER BY created_at DESC
                    LIMIT ?3 OFFSET ?4
                    "#
                ))
                .bind(tenant_id)
                .bind(day)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM transactions
                    WHERE tenant_id = ?1 AND substr(transaction_number, 1, 8) = ?2
                    "#,
                )
                .bind(tenant_id)
                .bind(day)
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<Sqlite, TransactionRow>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS} FROM transactions
                    WHERE tenant_id = ?1
                    ORDER BY created_at DESC
                    LIMIT ?2 OFFSET ?3
                    "#
                ))
                .bind(tenant_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE tenant_id = ?1")
                        .bind(tenant_id)
                        .fetch_one(&self.pool)
                        .await?;

                (rows, total)
            }
        };

        let mut transactions = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.lines_for(&row.id).await?;
            transactions.push(row.into_transaction(lines));
        }

        Ok((transactions, total))
    }

    /// Fetches every transaction whose embedded business-day key falls in
    /// `[start_key, end_key]` (inclusive, `YYYYMMDD` keys), newest first,
    /// with lines attached. Both statuses are returned; report views
    /// decide what to exclude.
    pub async fn fetch_day_range(
        &self,
        tenant_id: &str,
        start_key: &str,
        end_key: &str,
    ) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<Sqlite, TransactionRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM transactions
            WHERE tenant_id = ?1
              AND substr(transaction_number, 1, 8) BETWEEN ?2 AND ?3
            ORDER BY created_at DESC
            "#
        ))
        .bind(tenant_id)
        .bind(start_key)
        .bind(end_key)
        .fetch_all(&self.pool)
        .await?;

        // One join query for all lines in the range, grouped in memory.
        let line_rows = sqlx::query_as::<Sqlite, LineRow>(
            r#"
            SELECT l.transaction_id, l.item_id, l.name, l.quantity, l.unit_price, l.line_total
            FROM transaction_lines l
            JOIN transactions t ON t.id = l.transaction_id
            WHERE t.tenant_id = ?1
              AND substr(t.transaction_number, 1, 8) BETWEEN ?2 AND ?3
            ORDER BY l.transaction_id, l.position
            "#,
        )
        .bind(tenant_id)
        .bind(start_key)
        .bind(end_key)
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_tx: HashMap<String, Vec<TransactionLine>> = HashMap::new();
        for line in line_rows {
            lines_by_tx
                .entry(line.transaction_id.clone())
                .or_default()
                .push(line.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_tx.remove(&row.id).unwrap_or_default();
                row.into_transaction(lines)
            })
            .collect())
    }

    /// Performs the completed → voided transition.
    ///
    /// Returns `true` when this call made the transition. `false` means
    /// the row was not in `completed` state (already voided, possibly by
    /// a concurrent caller); the caller decides how to report that.
    /// Totals and lines are untouched.
    pub async fn void(
        &self,
        tenant_id: &str,
        id: &str,
        voided_by: &str,
        reason: &str,
        voided_at: chrono::DateTime<chrono::Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = 'voided',
                voided_at = ?3,
                voided_by = ?4,
                void_reason = ?5
            WHERE tenant_id = ?1 AND id = ?2 AND status = 'completed'
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(voided_at)
        .bind(voided_by)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn lines_for(&self, transaction_id: &str) -> DbResult<Vec<TransactionLine>> {
        let rows = sqlx::query_as::<Sqlite, LineRow>(
            r#"
            SELECT transaction_id, item_id, name, quantity, unit_price, line_total
            FROM transaction_lines
            WHERE transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TransactionLine::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
