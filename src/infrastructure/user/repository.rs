//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTables {
    users: HashMap<UserId, User>,
    /// email -> user ID
    email_index: HashMap<String, UserId>,
    /// registration number -> user ID
    registration_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
///
/// All tables live behind one lock so index checks and inserts are atomic.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<UserTables>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_by_identity(
        &self,
        email: &str,
        registration_number: &str,
    ) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .filter(|user| user.registration_number() == registration_number)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if tables.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict("Email is already registered"));
        }

        if tables
            .registration_index
            .contains_key(user.registration_number())
        {
            return Err(DomainError::conflict("Registration number is already registered"));
        }

        tables
            .email_index
            .insert(user.email().to_string(), *user.id());
        tables
            .registration_index
            .insert(user.registration_number().to_string(), *user.id());
        tables.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(email: &str, registration_number: &str) -> User {
        User::new(UserId::generate(), "Test User", email, registration_number, "hash")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("ada@example.com", "21BCE0001");

        repo.create(user.clone()).await.unwrap();

        let fetched = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(fetched.email(), "ada@example.com");

        let by_email = repo.get_by_email("ada@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("ada@example.com", "21BCE0002"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_registration_number_rejected() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("bob@example.com", "21BCE0001"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_identity_requires_both_fields() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_test_user("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        assert!(repo
            .find_by_identity("ada@example.com", "21BCE0001")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_identity("ada@example.com", "21BCE9999")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_identity("nobody@example.com", "21BCE0001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("ada@example.com", "21BCE0001");
        repo.create(user.clone()).await.unwrap();

        let users = repo
            .get_many(&[*user.id(), UserId::generate()])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
    }
}
