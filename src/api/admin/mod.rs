//! Admin API endpoints for reviewing registrations

pub mod account;
pub mod teams;

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Account
        .route("/login", post(account::login))
        .route("/change-password", post(account::change_password))
        // Team review
        .route("/teams", get(teams::list_teams))
        .route(
            "/teams/{team_id}/payment-status",
            patch(teams::set_payment_status),
        )
        .route(
            "/teams/{team_id}/approval-status",
            patch(teams::set_approval_status),
        )
        .route("/stats", get(teams::get_stats))
}
