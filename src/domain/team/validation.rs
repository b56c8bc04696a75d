//! Team validation

use thiserror::Error;

use super::entity::SizeClass;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Invalid team ID: {0}")]
    InvalidId(String),

    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name must be at least {0} characters")]
    NameTooShort(usize),

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Problem statement cannot be empty")]
    EmptyProblemStatement,

    #[error("Solo teams cannot have additional members")]
    SoloWithMembers,

    #[error("Duo teams must have exactly 1 additional member")]
    DuoMemberCount,

    #[error("Teams must have between {min} and {max} additional members")]
    TeamMemberCount { min: usize, max: usize },

    #[error("Team leader cannot be listed as a member")]
    LeaderListedAsMember,

    #[error("A member cannot be listed twice")]
    DuplicateMember,

    #[error("Invalid size class: '{0}'. Expected solo, duo or team")]
    InvalidSizeClass(String),

    #[error("Invalid payment status: '{0}'. Expected pending, verified or rejected")]
    InvalidPaymentStatus(String),

    #[error("Invalid approval status: '{0}'. Expected pending, approved or rejected")]
    InvalidApprovalStatus(String),

    #[error("Invalid registration number: '{0}'")]
    InvalidRegistrationNumber(String),
}

const MIN_TEAM_NAME_LENGTH: usize = 2;
const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Minimum extra members for the `Team` size class
pub const TEAM_MIN_MEMBERS: usize = 2;
/// Maximum extra members for the `Team` size class
pub const TEAM_MAX_MEMBERS: usize = 4;

/// Validate a team name (expects the trimmed form)
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    let length = name.chars().count();

    if length < MIN_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooShort(MIN_TEAM_NAME_LENGTH));
    }

    if length > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a problem statement
pub fn validate_problem_statement(problem_statement: &str) -> Result<(), TeamValidationError> {
    if problem_statement.trim().is_empty() {
        return Err(TeamValidationError::EmptyProblemStatement);
    }

    Ok(())
}

/// Validate the number of additional members (leader excluded) against the size class
pub fn validate_member_count(
    size_class: SizeClass,
    member_count: usize,
) -> Result<(), TeamValidationError> {
    match size_class {
        SizeClass::Solo if member_count != 0 => Err(TeamValidationError::SoloWithMembers),
        SizeClass::Duo if member_count != 1 => Err(TeamValidationError::DuoMemberCount),
        SizeClass::Team if !(TEAM_MIN_MEMBERS..=TEAM_MAX_MEMBERS).contains(&member_count) => {
            Err(TeamValidationError::TeamMemberCount {
                min: TEAM_MIN_MEMBERS,
                max: TEAM_MAX_MEMBERS,
            })
        }
        _ => Ok(()),
    }
}
