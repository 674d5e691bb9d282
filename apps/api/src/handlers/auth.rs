//! Authentication handlers: login, current principal, password change.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use warung_core::types::{Principal, Tenant};
use warung_core::{validation, CoreError};

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::handlers::users::UserView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid email or password"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::unauthenticated("Invalid email or password"));
    }

    if !user.is_active {
        return Err(ApiError::unauthenticated("Account is disabled"));
    }

    let tenant = state.db.tenants().get(&user.tenant_id).await?;
    let token = state.jwt.generate_token(&user.id, &user.tenant_id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserView::from(user),
        tenant,
    }))
}

/// `GET /api/v1/auth/me`
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<MeResponse>, ApiError> {
    let tenant = state.db.tenants().get(&principal.tenant_id).await?;
    Ok(Json(MeResponse {
        user: principal,
        tenant,
    }))
}

/// `PUT /api/v1/auth/password`
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validation::validate_password(&payload.new_password).map_err(CoreError::from)?;

    let hash = hash_password(&payload.new_password)?;
    state
        .db
        .users()
        .update_password(&principal.user_id, &hash)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Password updated" })))
}
