//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator tracking applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration unless already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        // Migrations hold several statements, so they go over the simple query protocol
        sqlx::raw_sql(migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(true)
    }
}

/// A forward-only schema migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

/// Schema migrations, in application order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create users table",
            up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                registration_number TEXT NOT NULL,
                phone TEXT,
                college TEXT,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_unique UNIQUE (email),
                CONSTRAINT users_registration_number_unique UNIQUE (registration_number)
            );
            "#,
        },
        Migration {
            version: 2,
            description: "Create admins table",
            up: r#"
            CREATE TABLE IF NOT EXISTS admins (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login_at TIMESTAMPTZ,
                CONSTRAINT admins_username_unique UNIQUE (username)
            );
            "#,
        },
        Migration {
            version: 3,
            description: "Create teams and participants tables",
            up: r#"
            CREATE SEQUENCE IF NOT EXISTS team_registration_seq START 1;

            CREATE TABLE IF NOT EXISTS teams (
                id UUID PRIMARY KEY,
                name_key TEXT NOT NULL,
                registration_number TEXT NOT NULL,
                leader_id UUID NOT NULL REFERENCES users(id),
                approval_status TEXT NOT NULL,
                payment_status TEXT NOT NULL,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT teams_name_unique UNIQUE (name_key),
                CONSTRAINT teams_registration_number_unique UNIQUE (registration_number)
            );
            CREATE INDEX IF NOT EXISTS idx_teams_created_at ON teams(created_at);
            CREATE INDEX IF NOT EXISTS idx_teams_approval_status ON teams(approval_status);

            CREATE TABLE IF NOT EXISTS team_participants (
                user_id UUID NOT NULL REFERENCES users(id),
                team_id UUID NOT NULL REFERENCES teams(id),
                CONSTRAINT team_participants_user_unique PRIMARY KEY (user_id)
            );
            CREATE INDEX IF NOT EXISTS idx_team_participants_team ON team_participants(team_id);
            "#,
        },
    ]
}

/// Runs all pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in schema_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}
