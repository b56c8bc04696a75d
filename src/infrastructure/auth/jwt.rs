//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::admin::Admin;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Who a token was issued to; user tokens never open admin routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    User,
    Admin,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user or admin ID)
    pub sub: String,
    pub kind: SubjectKind,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    fn new(sub: String, kind: SubjectKind, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub,
            kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Get the subject ID from claims
    pub fn subject(&self) -> &str {
        &self.sub
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue a token for a participant
    fn generate_for_user(&self, user: &User) -> Result<String, DomainError>;

    /// Issue a token for an administrator
    fn generate_for_admin(&self, admin: &Admin) -> Result<String, DomainError>;

    /// Validate a token and require it to belong to `expected`
    fn validate(&self, token: &str, expected: SubjectKind) -> Result<JwtClaims, DomainError>;

    /// Get the token expiration time in hours
    fn expiration_hours(&self) -> u64;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn sign(&self, claims: &JwtClaims) -> Result<String, DomainError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }
}

impl JwtGenerator for JwtService {
    fn generate_for_user(&self, user: &User) -> Result<String, DomainError> {
        self.sign(&JwtClaims::new(
            user.id().to_string(),
            SubjectKind::User,
            self.config.expiration_hours,
        ))
    }

    fn generate_for_admin(&self, admin: &Admin) -> Result<String, DomainError> {
        self.sign(&JwtClaims::new(
            admin.id().to_string(),
            SubjectKind::Admin,
            self.config.expiration_hours,
        ))
    }

    fn validate(&self, token: &str, expected: SubjectKind) -> Result<JwtClaims, DomainError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| DomainError::authentication(format!("Invalid token: {}", e)))?;

        if token_data.claims.kind != expected {
            return Err(DomainError::authentication("Token was not issued for this audience"));
        }

        Ok(token_data.claims)
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}
