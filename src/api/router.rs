use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::admin;
use super::auth;
use super::health;
use super::participant;
use super::state::AppState;

/// Room for multipart boundaries and headers on top of the screenshot itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.payment_workflow.max_upload_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Participant sign-up and login
        .nest("/auth", auth::create_auth_router())
        // Team registration, payment proofs, problem statements
        .nest("/api", participant::create_participant_router())
        // Admin API
        .nest("/admin", admin::create_admin_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
