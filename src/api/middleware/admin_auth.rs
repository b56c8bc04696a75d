//! Administrator authentication using JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use super::user_auth::extract_jwt_token;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::admin::{Admin, AdminId};
use crate::domain::DomainError;
use crate::infrastructure::auth::SubjectKind;

/// Extractor that requires a valid admin token
///
/// Participant tokens are rejected even when correctly signed.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Admin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token, SubjectKind::Admin)?;
        let admin_id = AdminId::parse(claims.subject())
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        match state.admin_service.get(&admin_id).await {
            Ok(admin) => {
                debug!(admin_id = %admin_id, username = %admin.username(), "Admin access");
                Ok(RequireAdmin(admin))
            }
            Err(DomainError::NotFound { .. }) => {
                Err(ApiError::unauthorized("Admin account no longer exists"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
