//! Admin repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Admin, AdminId};
use crate::domain::DomainError;

/// Repository trait for admin accounts
#[async_trait]
pub trait AdminRepository: Send + Sync + Debug {
    /// Get an admin by ID
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError>;

    /// Get an admin by username (for login)
    async fn get_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError>;

    /// Create a new admin; duplicate usernames yield `DomainError::Conflict`
    async fn create(&self, admin: Admin) -> Result<Admin, DomainError>;

    /// Update an existing admin
    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError>;
}
