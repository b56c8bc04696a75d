//! Storage infrastructure - PostgreSQL pool, migrations and error helpers

pub mod migrations;
mod postgres;

pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, unique_violation, PostgresConfig};
