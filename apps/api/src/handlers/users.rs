//! Staff management handlers: listing, invites, profile updates.
//!
//! All owner-only except the public invite endpoints (`invite_info`,
//! `accept_invite`), which are reached by the invitee before they have
//! any credential.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use warung_core::types::{Principal, Role, Tenant};
use warung_core::{validation, CoreError};

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// A user as exposed over the API: no password hash, no invite token.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: warung_db::UserStatus,
    pub is_active: bool,
}

impl From<warung_db::UserRecord> for UserView {
    fn from(record: warung_db::UserRecord) -> Self {
        UserView {
            id: record.id,
            tenant_id: record.tenant_id,
            name: record.name,
            email: record.email,
            role: record.role,
            status: record.status,
            is_active: record.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserView>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub name: String,
    pub email: String,
    /// Defaults to cashier.
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub user: UserView,
    pub invite_token: String,
    pub invite_link: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct InviteInfoResponse {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub tenant_name: String,
    pub invited_by: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInviteResponse {
    pub message: String,
    pub token: String,
    pub user: UserView,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/v1/users` - owner only.
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserListResponse>, ApiError> {
    principal.require_owner()?;

    let users: Vec<UserView> = state
        .db
        .users()
        .list(&principal.tenant_id)
        .await?
        .into_iter()
        .map(UserView::from)
        .collect();

    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// `POST /api/v1/users/invite` - owner only.
pub async fn invite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), ApiError> {
    principal.require_owner()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::invalid_argument("Name is required"));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::invalid_argument("Email is required"));
    }

    if state
        .db
        .users()
        .get_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::invalid_argument("Email already registered"));
    }

    let user = state
        .db
        .users()
        .create_invited(
            &principal.tenant_id,
            &payload.name,
            &payload.email,
            payload.role.unwrap_or(Role::Cashier),
            &principal.user_id,
        )
        .await?;

    let invite_token = user.invite_token.clone().unwrap_or_default();

    info!(user_id = %user.id, email = %user.email, "Staff invited");

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            message: format!("Invite sent to {}", user.email),
            invite_link: format!("/invite/{invite_token}"),
            invite_token,
            user: UserView::from(user),
        }),
    ))
}

/// `GET /api/v1/users/invite/{token}` - public.
pub async fn invite_info(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InviteInfoResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_invite_token(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("Invite", &token))?;

    if user.status != warung_db::UserStatus::Invited {
        return Err(ApiError::invalid_state("Invite already used"));
    }

    let tenant = state.db.tenants().get(&user.tenant_id).await?;
    let inviter = match &user.invited_by {
        Some(id) => state.db.users().get_by_id(id).await?,
        None => None,
    };

    Ok(Json(InviteInfoResponse {
        name: user.name,
        email: user.email,
        role: user.role,
        tenant_name: tenant.map(|t| t.name).unwrap_or_else(|| "Warung".to_string()),
        invited_by: inviter.map(|u| u.name).unwrap_or_else(|| "Owner".to_string()),
    }))
}

/// `POST /api/v1/users/accept-invite` - public.
pub async fn accept_invite(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInviteRequest>,
) -> Result<Json<AcceptInviteResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_invite_token(&payload.token)
        .await?
        .ok_or_else(|| ApiError::not_found("Invite", &payload.token))?;

    if user.status != warung_db::UserStatus::Invited {
        return Err(ApiError::invalid_state("Invite already used"));
    }

    validation::validate_password(&payload.password).map_err(CoreError::from)?;
    let hash = hash_password(&payload.password)?;
    state.db.users().accept_invite(&user.id, &hash).await?;

    let tenant = state.db.tenants().get(&user.tenant_id).await?;
    let token = state.jwt.generate_token(&user.id, &user.tenant_id)?;

    info!(user_id = %user.id, "Invite accepted");

    let activated = state
        .db
        .users()
        .get_by_id(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &user.id))?;

    Ok(Json(AcceptInviteResponse {
        message: "Welcome! Your account is active".to_string(),
        token,
        user: UserView::from(activated),
        tenant,
    }))
}

/// `PUT /api/v1/users/{id}` - owner only, never on yourself.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    principal.require_owner()?;

    if user_id == principal.user_id {
        return Err(ApiError::invalid_argument(
            "Use the profile endpoints to edit your own account",
        ));
    }

    let updated = state
        .db
        .users()
        .update_profile(
            &principal.tenant_id,
            &user_id,
            payload.name.as_deref(),
            payload.role,
            payload.is_active,
        )
        .await?;

    Ok(Json(UserView::from(updated)))
}

/// `DELETE /api/v1/users/{id}` - owner only, soft-disable, never on
/// yourself.
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_owner()?;

    if user_id == principal.user_id {
        return Err(ApiError::invalid_argument("Cannot remove your own account"));
    }

    state
        .db
        .users()
        .disable(&principal.tenant_id, &user_id)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Staff member removed" })))
}
