//! Participant-facing endpoints: team registration, payment proofs and the
//! problem statement catalog

pub mod problems;
pub mod teams;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create the participant API router
pub fn create_participant_router() -> Router<AppState> {
    Router::new()
        .route("/teams", post(teams::register_team).get(teams::list_approved_teams))
        .route("/teams/me", get(teams::get_my_team))
        .route("/teams/{team_id}/payment", post(teams::upload_payment_proof))
        .route("/problem-statements", get(problems::list_problem_statements))
}
