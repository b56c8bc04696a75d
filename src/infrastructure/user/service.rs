//! User service for sign-up and authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    normalize_email, normalize_registration_number, validate_email, validate_name,
    validate_password, validate_registration_number, User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;

/// Request for registering a new participant
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub password: String,
    pub phone: Option<String>,
    pub college: Option<String>,
}

/// User service for sign-up and login
#[derive(Debug)]
pub struct UserService<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let name = request.name.trim();
        let email = normalize_email(&request.email);
        let registration_number = normalize_registration_number(&request.registration_number);

        validate_name(name)?;
        validate_email(&email)?;
        validate_registration_number(&registration_number)?;
        validate_password(&request.password)?;

        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let mut user = User::new(
            UserId::generate(),
            name,
            email,
            registration_number,
            password_hash,
        );

        if let Some(phone) = non_blank(request.phone) {
            user = user.with_phone(phone);
        }

        if let Some(college) = non_blank(request.college) {
            user = user.with_college(college);
        }

        let user = self.repository.create(user).await?;

        info!(
            user_id = %user.id(),
            registration_number = %user.registration_number(),
            "Registered user"
        );

        Ok(user)
    }

    /// Authenticate a user by email and password
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .filter(|user| self.hasher.verify(password, user.password_hash()))
            .ok_or_else(|| {
                debug!(email = %email, "Rejected user login");
                DomainError::authentication("Invalid email or password")
            })?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::Argon2Hasher;
    use crate::infrastructure::user::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn request(email: &str, registration_number: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            registration_number: registration_number.to_string(),
            password: "password123".to_string(),
            phone: Some("  ".to_string()),
            college: Some("VIT".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_identity() {
        let service = create_service();

        let user = service
            .register(request("  Ada@Example.COM ", " 21bce0001 "))
            .await
            .unwrap();

        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.registration_number(), "21BCE0001");
        assert_eq!(user.phone(), None);
        assert_eq!(user.college(), Some("VIT"));
        assert_ne!(user.password_hash(), "password123");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();
        service
            .register(request("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        let result = service.register(request("ADA@example.com", "21BCE0002")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_registration_number() {
        let service = create_service();
        service
            .register(request("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        let result = service.register(request("bob@example.com", "21bce0001")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let service = create_service();
        let mut req = request("ada@example.com", "21BCE0001");
        req.password = "short".to_string();

        let result = service.register(req).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();
        let user = service
            .register(request("ada@example.com", "21BCE0001"))
            .await
            .unwrap();

        let authenticated = service
            .authenticate("ADA@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(authenticated.id(), user.id());

        let wrong = service.authenticate("ada@example.com", "wrong-password").await;
        assert!(matches!(wrong, Err(DomainError::Authentication { .. })));

        let unknown = service.authenticate("nobody@example.com", "password123").await;
        assert!(matches!(unknown, Err(DomainError::Authentication { .. })));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = create_service();
        let result = service.get(&UserId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
