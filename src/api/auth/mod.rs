//! Participant authentication endpoints
//!
//! Sign-up, login and profile lookup for JWT-based authentication.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::RegisterUserRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Sign-up request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token issued after sign-up or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            registration_number: user.registration_number().to_string(),
            phone: user.phone().map(String::from),
            college: user.college().map(String::from),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

fn issue_token(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let token = state.jwt_service.generate_for_user(user)?;
    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
        expires_at: expires_at.to_rfc3339(),
    })
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            name: request.name,
            email: request.email,
            registration_number: request.registration_number,
            password: request.password,
            phone: request.phone,
            college: request.college,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    debug!(user_id = %user.id(), "Participant logged in");

    Ok(Json(issue_token(&state, &user)?))
}

/// GET /auth/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
