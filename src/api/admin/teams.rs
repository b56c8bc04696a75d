//! Team review admin endpoints

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::TeamId;
use crate::infrastructure::admin::TeamStats;
use crate::infrastructure::team::TeamView;

/// Status change request; the value is validated by the service
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTeamsResponse {
    pub teams: Vec<TeamView>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamUpdateResponse {
    pub message: String,
    pub team: TeamView,
}

fn parse_team_id(team_id: &str) -> Result<TeamId, ApiError> {
    TeamId::parse(team_id).map_err(|_| ApiError::not_found(format!("Team '{}' not found", team_id)))
}

/// GET /admin/teams
pub async fn list_teams(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let teams = state.admin_service.list_teams().await?;
    let total = teams.len();

    Ok(Json(ListTeamsResponse { teams, total }))
}

/// PATCH /admin/teams/{team_id}/payment-status
pub async fn set_payment_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(team_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<TeamUpdateResponse>, ApiError> {
    debug!(admin = %admin.username(), team_id = %team_id, status = %request.status, "Setting payment status");

    let team_id = parse_team_id(&team_id)?;
    let team = state
        .admin_service
        .set_payment_status(&team_id, &request.status)
        .await?;

    Ok(Json(TeamUpdateResponse {
        message: "Payment status updated".to_string(),
        team,
    }))
}

/// PATCH /admin/teams/{team_id}/approval-status
pub async fn set_approval_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(team_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<TeamUpdateResponse>, ApiError> {
    debug!(admin = %admin.username(), team_id = %team_id, status = %request.status, "Setting approval status");

    let team_id = parse_team_id(&team_id)?;
    let team = state
        .admin_service
        .set_approval_status(&team_id, &request.status)
        .await?;

    Ok(Json(TeamUpdateResponse {
        message: "Approval status updated".to_string(),
        team,
    }))
}

/// GET /admin/stats
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<TeamStats>, ApiError> {
    Ok(Json(state.admin_service.compute_stats().await?))
}
