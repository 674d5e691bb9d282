//! # User Repository
//!
//! Staff accounts: credentials, roles, and the invite flow. Password
//! hashes never leave this layer except through [`UserRecord`], which the
//! API layer is responsible for not serializing outward.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use warung_core::types::Role;

// =============================================================================
// Records
// =============================================================================

/// Account lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Can log in.
    Active,
    /// Created by an owner invite, waiting for the invitee to set a
    /// password.
    Invited,
    /// Soft-deleted; cannot log in.
    Disabled,
}

/// A `users` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub status: UserStatus,
    pub invited_by: Option<String>,
    pub invite_token: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

const COLUMNS: &str = r#"
    id, tenant_id, name, email, password_hash, role,
    is_active, status, invited_by, invite_token, created_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for user operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// A user by id. Unscoped: used by principal resolution, where the
    /// tenant comes *from* the user row.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<Sqlite, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// A user by email (emails are globally unique).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<Sqlite, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// A user by id, scoped to a tenant (staff administration).
    pub async fn get_for_tenant(&self, tenant_id: &str, id: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<Sqlite, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE tenant_id = ?1 AND id = ?2"
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// A pending invite by its token.
    pub async fn get_by_invite_token(&self, token: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<Sqlite, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE invite_token = ?1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All staff of a tenant, newest first.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<Sqlite, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE tenant_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts an already-built record (seeding and invites build the
    /// record; the unique email index rejects duplicates).
    pub async fn insert(&self, user: &UserRecord) -> DbResult<()> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, tenant_id, name, email, password_hash, role,
                is_active, status, invited_by, invite_token, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&user.id)
        .bind(&user.tenant_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.status)
        .bind(&user.invited_by)
        .bind(&user.invite_token)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Builds and inserts an invited user, returning the record with its
    /// fresh invite token.
    pub async fn create_invited(
        &self,
        tenant_id: &str,
        name: &str,
        email: &str,
        role: Role,
        invited_by: &str,
    ) -> DbResult<UserRecord> {
        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
            is_active: true,
            status: UserStatus::Invited,
            invited_by: Some(invited_by.to_string()),
            invite_token: Some(Uuid::new_v4().to_string()),
            created_at: Utc::now(),
        };
        self.insert(&user).await?;
        Ok(user)
    }

    /// Accepts an invite: sets the password hash, activates the account,
    /// and burns the token. Guarded on `status = 'invited'` so a token
    /// can be used exactly once.
    pub async fn accept_invite(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                password_hash = ?2,
                status = 'active',
                is_active = 1,
                invite_token = NULL
            WHERE id = ?1 AND status = 'invited'
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invite", id));
        }

        Ok(())
    }

    /// Changes a user's password hash.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?2 WHERE id = ?1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Updates profile fields; unset fields keep their value. Toggling
    /// `is_active` keeps `status` in sync (active/disabled).
    pub async fn update_profile(
        &self,
        tenant_id: &str,
        id: &str,
        name: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> DbResult<UserRecord> {
        let status = is_active.map(|active| {
            if active {
                UserStatus::Active
            } else {
                UserStatus::Disabled
            }
        });

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE(?3, name),
                role = COALESCE(?4, role),
                is_active = COALESCE(?5, is_active),
                status = COALESCE(?6, status)
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(is_active)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_for_tenant(tenant_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Soft-disables a user (cannot log in, row preserved).
    pub async fn disable(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET is_active = 0, status = 'disabled' WHERE tenant_id = ?1 AND id = ?2",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
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

    fn owner() -> UserRecord {
        UserRecord {
            id: "owner-1".to_string(),
            tenant_id: "tenant-1".to_string(),
            name: "Ibu Sari".to_string(),
            email: "sari@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Owner,
            is_active: true,
            status: UserStatus::Active,
            invited_by: None,
            invite_token: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookups() {
        let db = db().await;
        let repo = db.users();
        repo.insert(&owner()).await.unwrap();

        assert!(repo.get_by_id("owner-1").await.unwrap().is_some());
        assert!(repo
            .get_by_email("sari@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .get_for_tenant("tenant-2", "owner-1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = db().await;
        let repo = db.users();
        repo.insert(&owner()).await.unwrap();

        let mut dup = owner();
        dup.id = "owner-2".to_string();
        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_invite_flow() {
        let db = db().await;
        let repo = db.users();
        repo.insert(&owner()).await.unwrap();

        let invited = repo
            .create_invited(
                "tenant-1",
                "Budi",
                "budi@example.com",
                Role::Cashier,
                "owner-1",
            )
            .await
            .unwrap();
        assert_eq!(invited.status, UserStatus::Invited);
        let token = invited.invite_token.clone().unwrap();

        let found = repo.get_by_invite_token(&token).await.unwrap().unwrap();
        assert_eq!(found.id, invited.id);

        repo.accept_invite(&invited.id, "new-hash").await.unwrap();
        let activated = repo.get_by_id(&invited.id).await.unwrap().unwrap();
        assert_eq!(activated.status, UserStatus::Active);
        assert_eq!(activated.password_hash, "new-hash");
        assert!(activated.invite_token.is_none());

        // Token is burned; accepting twice fails.
        let err = repo.accept_invite(&invited.id, "other").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_profile_and_disable() {
        let db = db().await;
        let repo = db.users();
        repo.insert(&owner()).await.unwrap();

        let updated = repo
            .update_profile("tenant-1", "owner-1", Some("Sari"), Some(Role::Cashier), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Sari");
        assert_eq!(updated.role, Role::Cashier);
        assert_eq!(updated.status, UserStatus::Active);

        repo.disable("tenant-1", "owner-1").await.unwrap();
        let disabled = repo.get_by_id("owner-1").await.unwrap().unwrap();
        assert!(!disabled.is_active);
        assert_eq!(disabled.status, UserStatus::Disabled);
    }
}
