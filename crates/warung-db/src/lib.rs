//! # warung-db: Database Layer for Warung POS
//!
//! SQLite persistence for the transaction ledger and its supporting
//! tables, using sqlx with embedded migrations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (items, transactions,
//!   daily sequences, users, tenants)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warung_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("warung.db")).await?;
//! let seq = db.sequences().allocate("tenant-1", "20260807").await?;
//! ```
//!
//! The only shared mutable state in the whole system is what lives behind
//! this crate: the ledger rows and the per-`(tenant, day)` counters. Both
//! are mutated through single atomic statements (see
//! [`repository::sequence`] and [`repository::transaction`]).

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::item::ItemRepository;
pub use repository::sequence::SequenceRepository;
pub use repository::tenant::TenantRepository;
pub use repository::transaction::TransactionRepository;
pub use repository::user::{UserRecord, UserRepository, UserStatus};
