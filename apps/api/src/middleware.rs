//! Principal resolution middleware.
//!
//! Validates the `Authorization: Bearer <JWT>` header and re-reads the
//! user row, attaching a [`Principal`] to the request extensions for
//! downstream handlers. Disabled accounts and stale tokens are rejected
//! here, before any handler runs.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use warung_core::types::Principal;

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Middleware guarding every authenticated route.
pub async fn require_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::unauthenticated("Missing bearer token"))?;

    let claims = state.jwt.validate_token(token)?;

    // Role and active flag come from the row, not the token, so account
    // changes take effect on the next request.
    let user = state
        .db
        .users()
        .get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Unknown user"))?;

    if !user.is_active {
        return Err(ApiError::unauthenticated("Account is disabled"));
    }

    let principal = Principal {
        user_id: user.id,
        tenant_id: user.tenant_id,
        role: user.role,
        name: user.name,
    };

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
