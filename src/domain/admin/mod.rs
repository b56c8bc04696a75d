//! Admin domain
//!
//! Administrators own no teams; they authenticate separately from
//! participants and perform the approval and payment transitions.

mod entity;
mod repository;

pub use entity::{validate_username, Admin, AdminId, AdminRole, AdminValidationError};
pub use repository::AdminRepository;
