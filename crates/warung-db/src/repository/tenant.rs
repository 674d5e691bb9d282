//! # Tenant Repository
//!
//! Tenant profiles: the business name and contact details printed on
//! receipt headers and shown on the settings page.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use warung_core::types::Tenant;

#[derive(Debug, Clone, sqlx::FromRow)]
struct TenantRow {
    id: String,
    name: String,
    address: Option<String>,
    phone: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

/// Repository for tenant operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    /// Creates a new TenantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TenantRepository { pool }
    }

    /// A tenant by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Tenant>> {
        let row = sqlx::query_as::<Sqlite, TenantRow>(
            "SELECT id, name, address, phone, created_at FROM tenants WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// Creates a tenant and returns it.
    pub async fn insert(&self, name: &str) -> DbResult<Tenant> {
        let tenant = Tenant {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            address: None,
            phone: None,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO tenants (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&tenant.id)
            .bind(&tenant.name)
            .bind(tenant.created_at)
            .execute(&self.pool)
            .await?;

        Ok(tenant)
    }

    /// Updates profile fields; unset fields keep their value.
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<Tenant> {
        let result = sqlx::query(
            r#"
            UPDATE tenants SET
                name = COALESCE(?2, name),
                address = COALESCE(?3, address),
                phone = COALESCE(?4, phone)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Tenant", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Tenant", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_get_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tenants();

        let tenant = repo.insert("Warung Sari").await.unwrap();
        assert_eq!(tenant.name, "Warung Sari");
        assert!(tenant.address.is_none());

        let updated = repo
            .update(&tenant.id, None, Some("Jl. Melati 5"), Some("0812555123"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Warung Sari");
        assert_eq!(updated.address.as_deref(), Some("Jl. Melati 5"));
        assert_eq!(updated.phone.as_deref(), Some("0812555123"));

        let loaded = repo.get(&tenant.id).await.unwrap().unwrap();
        assert_eq!(loaded.phone.as_deref(), Some("0812555123"));
    }

    #[tokio::test]
    async fn test_update_missing_tenant() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .tenants()
            .update("missing", Some("X"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
