//! Liveness endpoint.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/v1/health`
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.db.health_check().await {
        return Err(ApiError::infrastructure());
    }
    Ok(Json(serde_json::json!({ "status": "healthy" })))
}
