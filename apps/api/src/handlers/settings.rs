//! Tenant settings handlers.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use warung_core::types::{Principal, Tenant};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// `GET /api/v1/settings`
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state
        .db
        .tenants()
        .get(&principal.tenant_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant", &principal.tenant_id))?;

    Ok(Json(tenant))
}

/// `PUT /api/v1/settings` - owner only.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<Tenant>, ApiError> {
    principal.require_owner()?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::invalid_argument("Name must not be empty"));
        }
    }

    let tenant = state
        .db
        .tenants()
        .update(
            &principal.tenant_id,
            payload.name.as_deref(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;

    Ok(Json(tenant))
}
