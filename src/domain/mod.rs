//! Domain layer - Core business logic and entities

pub mod admin;
pub mod error;
pub mod payment;
pub mod problem;
pub mod team;
pub mod user;

pub use admin::{Admin, AdminId, AdminRepository, AdminRole};
pub use error::DomainError;
pub use payment::{compression_ratio, ObjectMetadata, ObjectStorage, ProcessedProof, StoredObject};
pub use problem::{list_problem_statements, ProblemStatement};
pub use team::{
    ApprovalStatus, PaymentProof, PaymentStatus, RegistrationNumber, SizeClass, Team, TeamId,
    TeamQuery, TeamRepository, TeamValidationError,
};
pub use user::{User, UserId, UserRepository, UserSummary, UserValidationError};

impl From<TeamValidationError> for DomainError {
    fn from(err: TeamValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

impl From<admin::AdminValidationError> for DomainError {
    fn from(err: admin::AdminValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}
