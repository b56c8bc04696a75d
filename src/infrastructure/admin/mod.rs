//! Admin infrastructure module
//!
//! Admin account repositories and the oversight service used by the admin API.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresAdminRepository;
pub use repository::InMemoryAdminRepository;
pub use service::{verification_rate, AdminService, TeamStats};
