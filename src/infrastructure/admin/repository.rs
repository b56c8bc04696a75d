//! In-memory admin repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::admin::{Admin, AdminId, AdminRepository};
use crate::domain::DomainError;

/// In-memory implementation of AdminRepository
#[derive(Debug, Default)]
pub struct InMemoryAdminRepository {
    admins: RwLock<HashMap<AdminId, Admin>>,
}

impl InMemoryAdminRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().await;
        Ok(admins.get(id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().await;
        Ok(admins.values().find(|a| a.username() == username).cloned())
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write().await;

        if admins.values().any(|a| a.username() == admin.username()) {
            return Err(DomainError::conflict(format!(
                "Admin '{}' already exists",
                admin.username()
            )));
        }

        admins.insert(*admin.id(), admin.clone());
        Ok(admin)
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write().await;

        match admins.get_mut(admin.id()) {
            Some(existing) => {
                *existing = admin.clone();
                Ok(admin.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Admin '{}' not found",
                admin.id()
            ))),
        }
    }
}
