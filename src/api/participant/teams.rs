//! Team registration and payment proof endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiErrorType, Json};
use crate::domain::team::{PaymentStatus, SizeClass, TeamId};
use crate::infrastructure::team::{MemberIdentifier, RegisterTeamRequest, TeamView};

/// Multipart field carrying the screenshot
pub const PAYMENT_SCREENSHOT_FIELD: &str = "paymentScreenshot";

/// Accepted screenshot content types
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Deserialize)]
pub struct MemberInput {
    pub email: String,
    pub registration_number: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterTeamApiRequest {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<MemberInput>,
    pub problem_statement: String,
    pub size_class: SizeClass,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub message: String,
    pub team: TeamView,
}

#[derive(Debug, Serialize)]
pub struct ListTeamsResponse {
    pub teams: Vec<TeamView>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct PaymentUploadResponse {
    pub message: String,
    pub team_id: String,
    pub payment_screenshot: String,
    pub payment_status: PaymentStatus,
    pub compression: CompressionStats,
}

/// POST /api/teams
pub async fn register_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<RegisterTeamApiRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    debug!(user_id = %user.id(), team_name = %request.team_name, "Registering team");

    let members = request
        .members
        .into_iter()
        .map(|m| MemberIdentifier::new(m.email, m.registration_number))
        .collect();

    let team = state
        .team_registry
        .register_team(
            user.id(),
            RegisterTeamRequest {
                team_name: request.team_name,
                members,
                problem_statement: request.problem_statement,
                size_class: request.size_class,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamResponse {
            message: "Team registered successfully".to_string(),
            team,
        }),
    ))
}

/// GET /api/teams
pub async fn list_approved_teams(
    State(state): State<AppState>,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let teams = state.team_registry.list_approved_teams().await?;
    let total = teams.len();

    Ok(Json(ListTeamsResponse { teams, total }))
}

/// GET /api/teams/me
pub async fn get_my_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<TeamView>, ApiError> {
    Ok(Json(state.team_registry.find_team_for_user(user.id()).await?))
}

/// POST /api/teams/{team_id}/payment
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<PaymentUploadResponse>, ApiError> {
    let team_id = TeamId::parse(&team_id)
        .map_err(|_| ApiError::not_found(format!("Team '{}' not found", team_id)))?;

    let mut screenshot = Bytes::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PAYMENT_SCREENSHOT_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_ascii_lowercase);
        if !content_type
            .as_deref()
            .is_some_and(|ct| ALLOWED_IMAGE_TYPES.contains(&ct))
        {
            return Err(
                ApiError::bad_request("Only JPEG, PNG, WebP and GIF images are allowed")
                    .with_code("unsupported_image_type"),
            );
        }

        screenshot = field.bytes().await.map_err(multipart_error)?;
        break;
    }

    // A missing field reaches the workflow as an empty upload
    let original_size = screenshot.len() as u64;
    let attachment = state
        .payment_workflow
        .attach_payment_proof(&team_id, user.id(), screenshot, original_size)
        .await?;

    let proof = attachment.proof;
    Ok(Json(PaymentUploadResponse {
        message: "Payment screenshot uploaded successfully".to_string(),
        team_id: attachment.team.id().to_string(),
        payment_screenshot: proof.storage_url,
        payment_status: attachment.team.payment_status(),
        compression: CompressionStats {
            original_size: proof.original_byte_size,
            compressed_size: proof.compressed_byte_size,
            compression_ratio: proof.compression_ratio,
            width: proof.width,
            height: proof.height,
        },
    }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    let status = err.status();
    let error_type = if status == StatusCode::INTERNAL_SERVER_ERROR {
        ApiErrorType::ServerError
    } else {
        ApiErrorType::ValidationError
    };

    ApiError::new(status, error_type, err.body_text()).with_code("invalid_multipart")
}
