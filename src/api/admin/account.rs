//! Admin login and password management

use axum::extract::State;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::admin::{Admin, AdminRole};

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Admin account (safe to expose)
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
    pub role: AdminRole,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id().to_string(),
            username: admin.username().to_string(),
            role: admin.role(),
            created_at: admin.created_at().to_rfc3339(),
            last_login_at: admin.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminResponse,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admin = state
        .admin_service
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state.jwt_service.generate_for_admin(&admin)?;
    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(Json(AdminLoginResponse {
        token,
        admin: AdminResponse::from(&admin),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// POST /admin/change-password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .admin_service
        .change_password(admin.id(), &request.current_password, &request.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
