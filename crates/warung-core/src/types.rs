//! # Domain Types
//!
//! Core domain types for the Warung POS ledger.
//!
//! ## Snapshot Pattern
//! A [`TransactionLine`] freezes the catalog item's name and unit price at
//! the moment the transaction is built. Later catalog edits never change a
//! historical transaction - the ledger is immutable except for the single
//! completed → voided transition.
//!
//! ## Dual-Key Identity
//! A [`Transaction`] carries two identifiers:
//! - `id`: UUID v4, used for lookups and relations
//! - `transaction_number`: human-readable business key,
//!   `YYYYMMDD` + daily sequence (see [`crate::sequence`]), unique per tenant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Catalog Item
// =============================================================================

/// A catalog item that can be sold.
///
/// The ledger treats `price` as authoritative only at transaction-creation
/// time; the value is copied into each [`TransactionLine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this item belongs to.
    pub tenant_id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in whole rupiah.
    pub price: Money,

    /// Whether the item can currently be sold (soft delete flag).
    pub is_active: bool,

    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cart
// =============================================================================

/// A single requested cart entry: which item, how many.
///
/// This is checkout *input*; it resolves to a [`TransactionLine`] via a
/// catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub item_id: String,
    pub qty: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Accepted payment methods.
///
/// Settlement rules differ per method (see [`crate::settlement`]):
/// cash requires cover and produces change; the electronic methods settle
/// exactly and never produce change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash handed over the counter.
    Cash,
    /// QRIS instant transfer (scanned at the counter).
    Qris,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Stable lowercase name, matching the wire and storage encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Qris => "qris",
            PaymentMethod::Transfer => "transfer",
        }
    }

    /// Parses a method name; unknown names are an [`CoreError::UnknownPaymentMethod`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "cash" => Ok(PaymentMethod::Cash),
            "qris" => Ok(PaymentMethod::Qris),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(CoreError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status of a ledger transaction.
///
/// The only legal transition is `Completed` → `Voided`, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Paid and recorded.
    Completed,
    /// Cancelled after completion; figures preserved for audit.
    Voided,
}

impl TransactionStatus {
    /// Stable lowercase name, matching the wire and storage encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Voided => "voided",
        }
    }
}

// =============================================================================
// Transaction Line
// =============================================================================

/// One priced line of a transaction. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Catalog item this line was priced from.
    pub item_id: String,

    /// Item name at time of sale (frozen).
    pub name: String,

    /// Quantity sold (always >= 1).
    pub quantity: i64,

    /// Unit price at time of sale (frozen).
    pub unit_price: Money,

    /// `quantity × unit_price`.
    pub line_total: Money,
}

impl TransactionLine {
    /// Builds a line by snapshotting an item's name and price.
    pub fn from_item(item: &Item, quantity: i64) -> Self {
        TransactionLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
            line_total: item.price.multiply_quantity(quantity),
        }
    }
}

/// Sums line totals into a transaction total.
pub fn total_of(lines: &[TransactionLine]) -> Money {
    lines.iter().map(|l| l.line_total).sum()
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable, priced ledger record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub tenant_id: String,

    /// Business key: UTC day + daily sequence, unique per tenant.
    pub transaction_number: String,

    /// Ordered, non-empty priced lines.
    pub lines: Vec<TransactionLine>,

    /// Sum of line totals; never changes, including after voiding.
    pub total: Money,

    pub payment_method: PaymentMethod,

    /// Amount tendered (normalized to `total` for electronic methods).
    pub payment_amount: Money,

    /// Change returned; zero for electronic methods.
    pub change_amount: Money,

    /// Opaque reconciliation reference for electronic payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    pub status: TransactionStatus,

    /// Void metadata; all three present iff `status == Voided`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<String>,

    /// Cashier that recorded the transaction.
    pub created_by: String,
    pub created_by_name: String,

    /// Authoritative event time.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The UTC business-day key embedded in the transaction number.
    pub fn day_key(&self) -> &str {
        crate::sequence::day_key_of(&self.transaction_number)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn is_voided(&self) -> bool {
        self.status == TransactionStatus::Voided
    }
}

// =============================================================================
// Principals & Roles
// =============================================================================

/// Staff roles within a tenant. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Business owner: full access including void, summary, export,
    /// staff management, and settings.
    Owner,
    /// Cashier: records transactions, reads the catalog and daily views.
    Cashier,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Cashier => "cashier",
        }
    }
}

/// The authenticated caller, resolved from a bearer credential.
///
/// Every ledger and report operation is scoped to `tenant_id`; the
/// owner-only gate is [`Principal::require_owner`] - the single reusable
/// capability check invoked before any owner-only operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub tenant_id: String,
    pub role: Role,
    pub name: String,
}

impl Principal {
    /// Centralized owner capability check.
    pub fn require_owner(&self) -> Result<(), CoreError> {
        if self.role == Role::Owner {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                required: Role::Owner,
            })
        }
    }
}

// =============================================================================
// Tenant
// =============================================================================

/// A tenant (one isolated business account).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
