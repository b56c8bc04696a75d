//! Admin entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during admin validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdminValidationError {
    #[error("Invalid admin ID: {0}")]
    InvalidId(String),

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Invalid admin role: '{0}'")]
    InvalidRole(String),
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;

/// Validate an admin username
///
/// Rules:
/// - Minimum 3 characters
/// - Maximum 50 characters
/// - Only alphanumeric characters, underscores, and hyphens
pub fn validate_username(username: &str) -> Result<(), AdminValidationError> {
    if username.is_empty() {
        return Err(AdminValidationError::EmptyUsername);
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(AdminValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AdminValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(AdminValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

/// Admin identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(Uuid);

impl AdminId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(id: &str) -> Result<Self, AdminValidationError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| AdminValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AdminId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
    Superadmin,
}

impl std::str::FromStr for AdminRole {
    type Err = AdminValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            other => Err(AdminValidationError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Superadmin => write!(f, "superadmin"),
        }
    }
}

/// Administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    id: AdminId,
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    role: AdminRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl Admin {
    pub fn new(
        id: AdminId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: AdminRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rebuild an admin from persisted columns
    pub(crate) fn restore(
        id: AdminId,
        username: String,
        password_hash: String,
        role: AdminRole,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role,
            created_at,
            updated_at,
            last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &AdminId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> AdminRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Mutators

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ops_lead-2").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username(""), Err(AdminValidationError::EmptyUsername));
        assert_eq!(
            validate_username("ab"),
            Err(AdminValidationError::UsernameTooShort(3))
        );
        assert_eq!(
            validate_username("bad name"),
            Err(AdminValidationError::InvalidUsernameCharacter(' '))
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<AdminRole>().unwrap(), AdminRole::Admin);
        assert_eq!("superadmin".parse::<AdminRole>().unwrap(), AdminRole::Superadmin);
        assert!("root".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_admin_password_and_login() {
        let mut admin = Admin::new(AdminId::generate(), "admin", "hash", AdminRole::Admin);
        assert!(admin.last_login_at().is_none());

        admin.record_login();
        assert!(admin.last_login_at().is_some());

        admin.set_password_hash("new_hash");
        assert_eq!(admin.password_hash(), "new_hash");
    }

    #[test]
    fn test_admin_serialization_excludes_password() {
        let admin = Admin::new(AdminId::generate(), "admin", "secret_hash", AdminRole::Admin);
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("secret_hash"));
    }
}
