//! # Seed Data Generator
//!
//! Provisions a demo tenant with an owner account, a cashier, and a small
//! catalog for local development.
//!
//! ## Usage
//! ```bash
//! cargo run -p warung-api --bin seed
//!
//! # Specify database path
//! DATABASE_PATH=./data/warung.db cargo run -p warung-api --bin seed
//! ```
//!
//! Prints the demo credentials when done.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use warung_api::auth::hash_password;
use warung_api::ApiConfig;
use warung_core::types::Role;
use warung_core::Money;
use warung_db::{Database, DbConfig, UserRecord, UserStatus};

const OWNER_EMAIL: &str = "pemilik@warung.local";
const OWNER_PASSWORD: &str = "rahasia123";
const CASHIER_EMAIL: &str = "kasir@warung.local";
const CASHIER_PASSWORD: &str = "kasir123";

const CATALOG: &[(&str, i64)] = &[
    ("Nasi Goreng", 15_000),
    ("Mie Goreng", 13_000),
    ("Ayam Bakar", 20_000),
    ("Es Teh Manis", 5_000),
    ("Es Jeruk", 7_000),
    ("Kopi Susu", 10_000),
    ("Gorengan", 2_000),
    ("Kerupuk", 1_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let config = ApiConfig::load()?;
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let tenant = db.tenants().insert("Warung Sari").await?;
    db.tenants()
        .update(
            &tenant.id,
            None,
            Some("Jl. Melati No. 5, Yogyakarta"),
            Some("0812-3456-7890"),
        )
        .await?;
    info!(tenant_id = %tenant.id, "Tenant created");

    let owner = UserRecord {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.id.clone(),
        name: "Ibu Sari".to_string(),
        email: OWNER_EMAIL.to_string(),
        password_hash: hash_password(OWNER_PASSWORD)?,
        role: Role::Owner,
        is_active: true,
        status: UserStatus::Active,
        invited_by: None,
        invite_token: None,
        created_at: Utc::now(),
    };
    db.users().insert(&owner).await?;

    let cashier = UserRecord {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.id.clone(),
        name: "Budi".to_string(),
        email: CASHIER_EMAIL.to_string(),
        password_hash: hash_password(CASHIER_PASSWORD)?,
        role: Role::Cashier,
        is_active: true,
        status: UserStatus::Active,
        invited_by: Some(owner.id.clone()),
        invite_token: None,
        created_at: Utc::now(),
    };
    db.users().insert(&cashier).await?;
    info!("Staff accounts created");

    for (name, price) in CATALOG {
        db.items()
            .insert(&tenant.id, name, Money::new(*price))
            .await?;
    }
    info!(items = CATALOG.len(), "Catalog seeded");

    println!("Seed complete.");
    println!("  Tenant:  {} ({})", "Warung Sari", tenant.id);
    println!("  Owner:   {OWNER_EMAIL} / {OWNER_PASSWORD}");
    println!("  Cashier: {CASHIER_EMAIL} / {CASHIER_PASSWORD}");

    Ok(())
}
