//! User domain
//!
//! Participants who sign up for the hackathon. Users are referenced by teams
//! but never owned by them.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserSummary};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, normalize_registration_number, validate_email, validate_name,
    validate_password, validate_registration_number, UserValidationError,
};
