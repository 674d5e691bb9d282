//! # warung-api
//!
//! HTTP surface of the Warung POS backend.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         warung-api                               │
//! │                                                                  │
//! │  axum router ──► principal middleware ──► handlers ──► services  │
//! │                                                           │      │
//! │                    warung-core rules ◄────────────────────┤      │
//! │                    warung-db repositories ◄───────────────┘      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Public routes: login, invite preview/accept, health. Everything else
//! requires a bearer token; owner-only routes additionally pass the
//! centralized capability check inside the services/handlers.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;

pub use config::ApiConfig;
pub use state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/users/accept-invite", post(handlers::users::accept_invite))
        .route("/users/invite/{token}", get(handlers::users::invite_info))
        .route("/health", get(handlers::health::health));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password", put(handlers::auth::change_password))
        .route(
            "/items",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route(
            "/items/{id}",
            put(handlers::items::update).delete(handlers::items::remove),
        )
        .route(
            "/transactions",
            get(handlers::transactions::list).post(handlers::transactions::create),
        )
        .route("/transactions/{id}", get(handlers::transactions::get))
        .route(
            "/transactions/{id}/void",
            post(handlers::transactions::void),
        )
        .route("/reports/summary", get(handlers::reports::summary))
        .route("/reports/daily", get(handlers::reports::daily))
        .route("/reports/export", get(handlers::reports::export))
        .route("/dashboard/today", get(handlers::dashboard::today))
        .route("/users", get(handlers::users::list))
        .route("/users/invite", post(handlers::users::invite))
        .route(
            "/users/{id}",
            put(handlers::users::update).delete(handlers::users::remove),
        )
        .route(
            "/settings",
            get(handlers::settings::get).put(handlers::settings::update),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_principal,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}
