use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Missing or invalid credential
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Caller is known but not allowed to touch the resource
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// External collaborator (object storage, image codec) failed
    #[error("Dependency error: {provider} - {message}")]
    Dependency { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn dependency(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dependency {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Team 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Team 'abc' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid payment status");
        assert_eq!(error.to_string(), "Validation error: Invalid payment status");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Team name already exists");
        assert_eq!(error.to_string(), "Conflict: Team name already exists");
        assert!(error.is_conflict());
    }

    #[test]
    fn test_dependency_error() {
        let error = DomainError::dependency("cloudinary", "HTTP 500");
        assert_eq!(error.to_string(), "Dependency error: cloudinary - HTTP 500");
        assert!(!error.is_conflict());
    }
}
