//! Catalog administration handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use warung_core::types::{Item, Principal};
use warung_core::{validation, CoreError, Money};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Defaults to true: cashiers only see sellable items.
    pub active_only: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
}

/// `GET /api/v1/items`
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ItemListResponse>, ApiError> {
    let items = state
        .db
        .items()
        .list(
            &principal.tenant_id,
            query.active_only.unwrap_or(true),
            query.search.as_deref(),
        )
        .await?;

    let total = items.len();
    Ok(Json(ItemListResponse { items, total }))
}

/// `POST /api/v1/items`
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    validation::validate_item_name(&payload.name).map_err(CoreError::from)?;
    validation::validate_price(payload.price).map_err(CoreError::from)?;

    let item = state
        .db
        .items()
        .insert(&principal.tenant_id, &payload.name, Money::new(payload.price))
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/v1/items/{id}`
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<Item>, ApiError> {
    if let Some(name) = &payload.name {
        validation::validate_item_name(name).map_err(CoreError::from)?;
    }
    if let Some(price) = payload.price {
        validation::validate_price(price).map_err(CoreError::from)?;
    }

    let item = state
        .db
        .items()
        .update(
            &principal.tenant_id,
            &item_id,
            payload.name.as_deref(),
            payload.price.map(Money::new),
        )
        .await?;

    Ok(Json(item))
}

/// `DELETE /api/v1/items/{id}` - soft delete.
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(item_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .items()
        .deactivate(&principal.tenant_id, &item_id)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Item removed" })))
}
