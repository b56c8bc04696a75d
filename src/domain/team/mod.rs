//! Team domain module
//!
//! A team is led by one user and carries up to four further members, a
//! registration number, and the payment proof with its verification status.
//! A user belongs to at most one team.

mod entity;
mod repository;
mod validation;

pub use entity::{
    team_name_key, ApprovalStatus, PaymentProof, PaymentStatus, RegistrationNumber, SizeClass,
    Team, TeamId,
};
pub use repository::{TeamQuery, TeamRepository};
pub use validation::{
    validate_member_count, validate_problem_statement, validate_team_name, TeamValidationError,
    TEAM_MAX_MEMBERS, TEAM_MIN_MEMBERS,
};
