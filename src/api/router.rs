use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::languages;
use super::state::AppState;
use super::user_languages;
use super::users;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Authentication endpoints (no auth required for login)
        .nest("/api/v1/auth", auth::router())
        // Account and language-association endpoints (token-guarded)
        .nest("/api/v1/users", users::router().merge(user_languages::router()))
        // Read-only catalog
        .nest("/api/v1/languages", languages::router())
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
