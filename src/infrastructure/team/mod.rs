//! Team infrastructure module
//!
//! Team repositories and the registry that enforces team composition.

mod postgres_repository;
mod repository;
mod service;
mod view;

pub use postgres_repository::PostgresTeamRepository;
pub use repository::InMemoryTeamRepository;
pub use service::{MemberIdentifier, RegisterTeamRequest, TeamRegistry};
pub use view::{load_team_view, load_team_views, TeamView};
