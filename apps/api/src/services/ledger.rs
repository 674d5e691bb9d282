//! # Ledger Service
//!
//! Checkout and void orchestration.
//!
//! ## Checkout Flow
//! ```text
//! validate cart shape ──► resolve every item (catalog gateway)
//!        │                        │ any miss aborts, nothing persisted
//!        ▼                        ▼
//! settle payment ──► allocate daily sequence (atomic counter)
//!        │                        │
//!        ▼                        ▼
//! build immutable record ──► persist row + lines in one transaction
//! ```
//!
//! Validation happens fully before any persistence; the only side effects
//! of a successful checkout are exactly one allocator call and exactly
//! one ledger write.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use warung_core::sequence::{business_day, day_key, transaction_number};
use warung_core::settlement::settle;
use warung_core::types::{
    total_of, CartEntry, PaymentMethod, Principal, Transaction, TransactionLine, TransactionStatus,
};
use warung_core::{validation, CoreError, Money};
use warung_db::Database;

use crate::error::ApiError;

/// Checkout request, as accepted from the transport layer.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cart: Vec<CartEntry>,
    /// Method name; parsed here so an unknown method is an
    /// InvalidArgument, not a deserialization failure.
    pub payment_method: String,
    pub payment_amount: i64,
    pub payment_reference: Option<String>,
}

/// Confirmation returned by a successful void.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VoidConfirmation {
    pub message: String,
    pub transaction_id: String,
    pub voided_by: String,
    pub reason: String,
}

/// Orchestrates ledger writes over the repositories.
#[derive(Clone)]
pub struct LedgerService {
    db: Database,
}

impl LedgerService {
    pub fn new(db: Database) -> Self {
        LedgerService { db }
    }

    /// Converts a cart into a persisted, immutable transaction record.
    pub async fn checkout(
        &self,
        principal: &Principal,
        request: CheckoutRequest,
    ) -> Result<Transaction, ApiError> {
        if request.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validation::validate_cart(&request.cart).map_err(CoreError::from)?;

        let method = PaymentMethod::parse(&request.payment_method)?;

        // Resolve every entry through the catalog gateway; any inactive
        // or missing item aborts the whole operation.
        let mut lines = Vec::with_capacity(request.cart.len());
        for entry in &request.cart {
            let item = self
                .db
                .items()
                .lookup_active(&principal.tenant_id, &entry.item_id)
                .await?
                .ok_or_else(|| CoreError::ItemNotFound(entry.item_id.clone()))?;
            lines.push(TransactionLine::from_item(&item, entry.qty));
        }

        let total = total_of(&lines);
        let settlement = settle(method, total, Money::new(request.payment_amount))?;

        // Exactly one allocator call; the counter update is atomic so a
        // concurrent checkout can never receive the same number.
        let now = Utc::now();
        let day = day_key(business_day(now));
        let sequence = self
            .db
            .sequences()
            .allocate(&principal.tenant_id, &day)
            .await?;
        let number = transaction_number(&day, sequence);

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            tenant_id: principal.tenant_id.clone(),
            transaction_number: number,
            lines,
            total,
            payment_method: method,
            payment_amount: settlement.payment_amount,
            change_amount: settlement.change_amount,
            payment_reference: request.payment_reference,
            status: TransactionStatus::Completed,
            voided_at: None,
            voided_by: None,
            void_reason: None,
            created_by: principal.user_id.clone(),
            created_by_name: principal.name.clone(),
            created_at: now,
        };

        self.db.transactions().insert(&transaction).await?;

        info!(
            transaction_number = %transaction.transaction_number,
            total = transaction.total.amount(),
            method = method.as_str(),
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Terminal completed → voided transition. Owner only.
    pub async fn void(
        &self,
        principal: &Principal,
        transaction_id: &str,
        reason: &str,
    ) -> Result<VoidConfirmation, ApiError> {
        principal.require_owner()?;
        validation::validate_void_reason(reason).map_err(CoreError::from)?;

        let existing = self
            .db
            .transactions()
            .get(&principal.tenant_id, transaction_id)
            .await?
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        if existing.is_voided() {
            return Err(CoreError::AlreadyVoided(transaction_id.to_string()).into());
        }

        let transitioned = self
            .db
            .transactions()
            .void(
                &principal.tenant_id,
                transaction_id,
                &principal.user_id,
                reason.trim(),
                Utc::now(),
            )
            .await?;

        // A concurrent void can win the race between our read and the
        // guarded update; the loser reports the same InvalidState.
        if !transitioned {
            return Err(CoreError::AlreadyVoided(transaction_id.to_string()).into());
        }

        info!(
            transaction_id,
            voided_by = %principal.user_id,
            "Transaction voided"
        );

        Ok(VoidConfirmation {
            message: "Transaction voided".to_string(),
            transaction_id: transaction_id.to_string(),
            voided_by: principal.name.clone(),
            reason: reason.trim().to_string(),
        })
    }

    /// A transaction by id, tenant-scoped.
    pub async fn get(
        &self,
        principal: &Principal,
        transaction_id: &str,
    ) -> Result<Transaction, ApiError> {
        self.db
            .transactions()
            .get(&principal.tenant_id, transaction_id)
            .await?
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()).into())
    }

    /// Paginated listing, newest first, optional day filter.
    pub async fn list(
        &self,
        principal: &Principal,
        day_key: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), ApiError> {
        let limit = limit.clamp(1, 500);
        let offset = offset.max(0);
        Ok(self
            .db
            .transactions()
            .list(&principal.tenant_id, day_key, limit, offset)
            .await?)
    }
}

// =============================================================================
// Service Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warung_core::types::Role;
    use warung_db::DbConfig;

    async fn setup() -> (Database, Principal, Principal, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tenant = db.tenants().insert("Warung Tester").await.unwrap();

        let owner = Principal {
            user_id: "owner-1".to_string(),
            tenant_id: tenant.id.clone(),
            role: Role::Owner,
            name: "Ibu Sari".to_string(),
        };
        let cashier = Principal {
            user_id: "cashier-1".to_string(),
            tenant_id: tenant.id.clone(),
            role: Role::Cashier,
            name: "Budi".to_string(),
        };

        // Catalog: item A active at 15000, item B inactive at 10000.
        let a = db
            .items()
            .insert(&tenant.id, "Nasi Goreng", Money::new(15_000))
            .await
            .unwrap();
        let b = db
            .items()
            .insert(&tenant.id, "Es Jeruk", Money::new(10_000))
            .await
            .unwrap();
        db.items().deactivate(&tenant.id, &b.id).await.unwrap();

        (db, owner, cashier, a.id, b.id)
    }

    fn cash_checkout(item_id: &str, qty: i64, amount: i64) -> CheckoutRequest {
        CheckoutRequest {
            cart: vec![CartEntry {
                item_id: item_id.to_string(),
                qty,
            }],
            payment_method: "cash".to_string(),
            payment_amount: amount,
            payment_reference: None,
        }
    }

    #[tokio::test]
    async fn test_cash_checkout_with_change() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let tx = ledger
            .checkout(&cashier, cash_checkout(&item_a, 2, 40_000))
            .await
            .unwrap();

        assert_eq!(tx.total.amount(), 30_000);
        assert_eq!(tx.payment_amount.amount(), 40_000);
        assert_eq!(tx.change_amount.amount(), 10_000);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert!(tx.transaction_number.ends_with("0001"));
        assert_eq!(tx.created_by_name, "Budi");
    }

    #[tokio::test]
    async fn test_inactive_item_aborts_checkout() {
        let (db, _owner, cashier, _, item_b) = setup().await;
        let ledger = LedgerService::new(db.clone());

        let err = ledger
            .checkout(&cashier, cash_checkout(&item_b, 1, 50_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);

        // Nothing persisted, no sequence consumed by the failed attempt.
        let (txs, total) = ledger.list(&cashier, None, 50, 0).await.unwrap();
        assert!(txs.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_empty_cart_and_unknown_method() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let err = ledger
            .checkout(
                &cashier,
                CheckoutRequest {
                    cart: vec![],
                    payment_method: "cash".to_string(),
                    payment_amount: 1,
                    payment_reference: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidArgument);

        let mut req = cash_checkout(&item_a, 1, 50_000);
        req.payment_method = "cheque".to_string();
        let err = ledger.checkout(&cashier, req).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_insufficient_cash_rejected() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let err = ledger
            .checkout(&cashier, cash_checkout(&item_a, 2, 25_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InsufficientPayment);
    }

    #[tokio::test]
    async fn test_qris_under_tender_normalized() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let tx = ledger
            .checkout(
                &cashier,
                CheckoutRequest {
                    cart: vec![CartEntry {
                        item_id: item_a,
                        qty: 2,
                    }],
                    payment_method: "qris".to_string(),
                    payment_amount: 0,
                    payment_reference: Some("QR-12345".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(tx.payment_amount.amount(), 30_000);
        assert_eq!(tx.change_amount.amount(), 0);
        assert_eq!(tx.payment_reference.as_deref(), Some("QR-12345"));
    }

    #[tokio::test]
    async fn test_sequence_numbers_increment_within_day() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let first = ledger
            .checkout(&cashier, cash_checkout(&item_a, 1, 15_000))
            .await
            .unwrap();
        let second = ledger
            .checkout(&cashier, cash_checkout(&item_a, 1, 15_000))
            .await
            .unwrap();

        assert!(first.transaction_number.ends_with("0001"));
        assert!(second.transaction_number.ends_with("0002"));
        assert_eq!(first.day_key(), second.day_key());
    }

    #[tokio::test]
    async fn test_void_requires_owner_and_is_terminal() {
        let (db, owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let tx = ledger
            .checkout(&cashier, cash_checkout(&item_a, 2, 40_000))
            .await
            .unwrap();

        // Cashier is refused before anything is touched.
        let err = ledger.void(&cashier, &tx.id, "wrong item").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PermissionDenied);

        let confirmation = ledger.void(&owner, &tx.id, "wrong item").await.unwrap();
        assert_eq!(confirmation.reason, "wrong item");
        assert_eq!(confirmation.voided_by, "Ibu Sari");

        // Second void is an InvalidState, and figures are preserved.
        let err = ledger.void(&owner, &tx.id, "again").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidState);

        let voided = ledger.get(&owner, &tx.id).await.unwrap();
        assert!(voided.is_voided());
        assert_eq!(voided.total.amount(), 30_000);
        assert_eq!(voided.void_reason.as_deref(), Some("wrong item"));
    }

    #[tokio::test]
    async fn test_void_missing_reason_rejected() {
        let (db, owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db);

        let tx = ledger
            .checkout(&cashier, cash_checkout(&item_a, 1, 15_000))
            .await
            .unwrap();
        let err = ledger.void(&owner, &tx.id, "   ").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_void_unknown_transaction_not_found() {
        let (db, owner, _cashier, _, _) = setup().await;
        let ledger = LedgerService::new(db);

        let err = ledger.void(&owner, "missing-id", "reason").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_tenant_isolation_on_reads() {
        let (db, _owner, cashier, item_a, _) = setup().await;
        let ledger = LedgerService::new(db.clone());

        let tx = ledger
            .checkout(&cashier, cash_checkout(&item_a, 1, 15_000))
            .await
            .unwrap();

        let other_tenant = db.tenants().insert("Warung Lain").await.unwrap();
        let outsider = Principal {
            user_id: "outsider".to_string(),
            tenant_id: other_tenant.id,
            role: Role::Owner,
            name: "Orang Lain".to_string(),
        };

        let err = ledger.get(&outsider, &tx.id).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
