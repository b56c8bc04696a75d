//! PostgreSQL admin repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::admin::{Admin, AdminId, AdminRepository, AdminRole};
use crate::domain::DomainError;
use crate::infrastructure::storage::unique_violation;

const ADMIN_COLUMNS: &str =
    "id, username, password_hash, role, created_at, updated_at, last_login_at";

/// PostgreSQL implementation of AdminRepository
#[derive(Debug, Clone)]
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get admin: {}", e)))?;

        row.as_ref().map(row_to_admin).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM admins WHERE username = $1",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get admin by username: {}", e)))?;

        row.as_ref().map(row_to_admin).transpose()
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, password_hash, role, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(admin.id().as_uuid())
        .bind(admin.username())
        .bind(admin.password_hash())
        .bind(admin.role().to_string())
        .bind(admin.created_at())
        .bind(admin.updated_at())
        .bind(admin.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => DomainError::conflict(format!("Admin '{}' already exists", admin.username())),
            None => DomainError::storage(format!("Failed to create admin: {}", e)),
        })?;

        Ok(admin)
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET password_hash = $2, role = $3, updated_at = $4, last_login_at = $5
            WHERE id = $1
            "#,
        )
        .bind(admin.id().as_uuid())
        .bind(admin.password_hash())
        .bind(admin.role().to_string())
        .bind(admin.updated_at())
        .bind(admin.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update admin: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Admin '{}' not found",
                admin.id()
            )));
        }

        Ok(admin.clone())
    }
}

fn row_to_admin(row: &sqlx::postgres::PgRow) -> Result<Admin, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read admin row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read)?;
    let role: String = row.try_get("role").map_err(read)?;
    let role: AdminRole = role.parse()?;

    Ok(Admin::restore(
        AdminId::from(id),
        row.try_get("username").map_err(read)?,
        row.try_get("password_hash").map_err(read)?,
        role,
        row.try_get("created_at").map_err(read)?,
        row.try_get("updated_at").map_err(read)?,
        row.try_get("last_login_at").map_err(read)?,
    ))
}
