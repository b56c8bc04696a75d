//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations enforce uniqueness of email and registration number and
/// return `DomainError::Conflict` on violation.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get several users at once; missing IDs are skipped
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Get a user by their (normalized) email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find the user matching both a (normalized) email and registration number
    async fn find_by_identity(
        &self,
        email: &str,
        registration_number: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;
}
