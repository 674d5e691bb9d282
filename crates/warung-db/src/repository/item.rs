//! # Item Repository
//!
//! Catalog item lookup and CRUD. The ledger consumes only
//! [`ItemRepository::lookup_active`] - the catalog gateway contract: an
//! item resolves at checkout time iff it exists for the tenant and is
//! active. Administration (create, rename, reprice, soft-delete) never
//! touches historical transactions, which carry their own price
//! snapshots.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use warung_core::money::Money;
use warung_core::types::Item;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ItemRow {
    id: String,
    tenant_id: String,
    name: String,
    price: Money,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            price: row.price,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Repository for catalog item operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Catalog gateway lookup: an item by id, for a tenant, **active only**.
    pub async fn lookup_active(&self, tenant_id: &str, item_id: &str) -> DbResult<Option<Item>> {
        let row = sqlx::query_as::<Sqlite, ItemRow>(
            r#"
            SELECT id, tenant_id, name, price, is_active, created_at
            FROM items
            WHERE tenant_id = ?1 AND id = ?2 AND is_active = 1
            "#,
        )
        .bind(tenant_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    /// An item by id for a tenant, regardless of active flag (admin reads).
    pub async fn get(&self, tenant_id: &str, item_id: &str) -> DbResult<Option<Item>> {
        let row = sqlx::query_as::<Sqlite, ItemRow>(
            r#"
            SELECT id, tenant_id, name, price, is_active, created_at
            FROM items
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    /// Lists a tenant's catalog ordered by name, optionally restricted to
    /// active items and/or a case-insensitive name substring.
    pub async fn list(
        &self,
        tenant_id: &str,
        active_only: bool,
        search: Option<&str>,
    ) -> DbResult<Vec<Item>> {
        debug!(tenant_id, active_only, ?search, "Listing items");

        let pattern = search.map(|s| format!("%{}%", s.trim()));

        let rows = match &pattern {
            Some(pattern) => {
                sqlx::query_as::<Sqlite, ItemRow>(
                    r#"
                    SELECT id, tenant_id, name, price, is_active, created_at
                    FROM items
                    WHERE tenant_id = ?1
                      AND (is_active = 1 OR ?2 = 0)
                      AND name LIKE ?3
                    ORDER BY name
                    "#,
                )
                .bind(tenant_id)
                .bind(active_only)
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Sqlite, ItemRow>(
                    r#"
                    SELECT id, tenant_id, name, price, is_active, created_at
                    FROM items
                    WHERE tenant_id = ?1
                      AND (is_active = 1 OR ?2 = 0)
                    ORDER BY name
                    "#,
                )
                .bind(tenant_id)
                .bind(active_only)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Creates a new active item and returns it.
    pub async fn insert(&self, tenant_id: &str, name: &str, price: Money) -> DbResult<Item> {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.trim().to_string(),
            price,
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %item.id, name = %item.name, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (id, tenant_id, name, price, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.tenant_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Updates name and/or price; unset fields keep their value.
    /// Returns the updated item.
    pub async fn update(
        &self,
        tenant_id: &str,
        item_id: &str,
        name: Option<&str>,
        price: Option<Money>,
    ) -> DbResult<Item> {
        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = COALESCE(?3, name),
                price = COALESCE(?4, price)
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(item_id)
        .bind(name.map(str::trim))
        .bind(price)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        self.get(tenant_id, item_id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", item_id))
    }

    /// Soft-deletes an item (sets `is_active = 0`).
    pub async fn deactivate(&self, tenant_id: &str, item_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE items SET is_active = 0 WHERE tenant_id = ?1 AND id = ?2",
        )
        .bind(tenant_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO tenants (id, name, created_at) VALUES ('tenant-1', 'Warung Tester', ?1)")
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_and_lookup_active() {
        let db = db().await;
        let repo = db.items();

        let item = repo
            .insert("tenant-1", "Kopi Susu", Money::new(15_000))
            .await
            .unwrap();

        let found = repo
            .lookup_active("tenant-1", &item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Kopi Susu");
        assert_eq!(found.price.amount(), 15_000);
        assert!(found.is_active);
    }

    #[tokio::test]
    async fn test_lookup_is_tenant_scoped() {
        let db = db().await;
        let repo = db.items();

        let item = repo
            .insert("tenant-1", "Kopi", Money::new(15_000))
            .await
            .unwrap();
        assert!(repo
            .lookup_active("tenant-2", &item.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_deactivated_item_not_sellable_but_still_visible_to_admin() {
        let db = db().await;
        let repo = db.items();

        let item = repo
            .insert("tenant-1", "Teh Botol", Money::new(10_000))
            .await
            .unwrap();
        repo.deactivate("tenant-1", &item.id).await.unwrap();

        assert!(repo
            .lookup_active("tenant-1", &item.id)
            .await
            .unwrap()
            .is_none());
        let admin_view = repo.get("tenant-1", &item.id).await.unwrap().unwrap();
        assert!(!admin_view.is_active);
    }

    #[tokio::test]
    async fn test_list_search_and_active_filter() {
        let db = db().await;
        let repo = db.items();

        repo.insert("tenant-1", "Kopi Susu", Money::new(15_000))
            .await
            .unwrap();
        repo.insert("tenant-1", "Kopi Hitam", Money::new(12_000))
            .await
            .unwrap();
        let teh = repo
            .insert("tenant-1", "Teh Manis", Money::new(8_000))
            .await
            .unwrap();
        repo.deactivate("tenant-1", &teh.id).await.unwrap();

        let all_active = repo.list("tenant-1", true, None).await.unwrap();
        assert_eq!(all_active.len(), 2);

        let everything = repo.list("tenant-1", false, None).await.unwrap();
        assert_eq!(everything.len(), 3);

        let kopi = repo.list("tenant-1", true, Some("Kopi")).await.unwrap();
        assert_eq!(kopi.len(), 2);
        // Ordered by name.
        assert_eq!(kopi[0].name, "Kopi Hitam");
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = db().await;
        let repo = db.items();

        let item = repo
            .insert("tenant-1", "Kopi", Money::new(15_000))
            .await
            .unwrap();

        let updated = repo
            .update("tenant-1", &item.id, None, Some(Money::new(17_000)))
            .await
            .unwrap();
        assert_eq!(updated.name, "Kopi");
        assert_eq!(updated.price.amount(), 17_000);

        let renamed = repo
            .update("tenant-1", &item.id, Some("Kopi Tubruk"), None)
            .await
            .unwrap();
        assert_eq!(renamed.name, "Kopi Tubruk");
        assert_eq!(renamed.price.amount(), 17_000);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let db = db().await;
        let err = db
            .items()
            .update("tenant-1", "missing", Some("X"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
