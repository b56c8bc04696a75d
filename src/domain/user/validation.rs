//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID: {0}")]
    InvalidId(String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Registration number cannot be empty")]
    EmptyRegistrationNumber,

    #[error("Registration number exceeds maximum length of {0} characters")]
    RegistrationNumberTooLong(usize),

    #[error("Registration number contains invalid character: '{0}'. Only letters, digits, '-' and '/' are allowed")]
    InvalidRegistrationNumberCharacter(char),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_NAME_LENGTH: usize = 100;
const MAX_REGISTRATION_NUMBER_LENGTH: usize = 32;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Normalize an email for storage and lookup (trimmed, lower-cased)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a registration number for storage and lookup (trimmed, upper-cased)
pub fn normalize_registration_number(registration_number: &str) -> String {
    registration_number.trim().to_uppercase()
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address (expects the normalized form)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate an institution registration number (expects the normalized form)
///
/// Rules:
/// - Cannot be empty
/// - Maximum 32 characters
/// - Only ASCII letters, digits, '-' and '/'
pub fn validate_registration_number(registration_number: &str) -> Result<(), UserValidationError> {
    if registration_number.is_empty() {
        return Err(UserValidationError::EmptyRegistrationNumber);
    }

    if registration_number.len() > MAX_REGISTRATION_NUMBER_LENGTH {
        return Err(UserValidationError::RegistrationNumberTooLong(
            MAX_REGISTRATION_NUMBER_LENGTH,
        ));
    }

    for c in registration_number.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '/' {
            return Err(UserValidationError::InvalidRegistrationNumberCharacter(c));
        }
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_normalize_registration_number() {
        assert_eq!(normalize_registration_number(" 21bce0001 "), "21BCE0001");
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("first.last+tag@uni.ac.in").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_valid_registration_numbers() {
        assert!(validate_registration_number("21BCE0001").is_ok());
        assert!(validate_registration_number("2021/CS-042").is_ok());
    }

    #[test]
    fn test_invalid_registration_numbers() {
        assert_eq!(
            validate_registration_number(""),
            Err(UserValidationError::EmptyRegistrationNumber)
        );
        assert_eq!(
            validate_registration_number(&"A".repeat(33)),
            Err(UserValidationError::RegistrationNumberTooLong(32))
        );
        assert_eq!(
            validate_registration_number("21 BCE"),
            Err(UserValidationError::InvalidRegistrationNumberCharacter(' '))
        );
    }

    #[test]
    fn test_names() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert_eq!(validate_name("   "), Err(UserValidationError::EmptyName));
        assert_eq!(
            validate_name(&"x".repeat(101)),
            Err(UserValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_passwords() {
        assert!(validate_password("password123").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(UserValidationError::PasswordTooShort(8))
        );
        assert_eq!(
            validate_password(&"a".repeat(129)),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }
}
