//! Authentication infrastructure module
//!
//! Argon2 password hashing and HS256 JWT issuance for participants and
//! administrators.

mod jwt;
mod password;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, SubjectKind};
pub use password::{Argon2Hasher, PasswordHasher};
