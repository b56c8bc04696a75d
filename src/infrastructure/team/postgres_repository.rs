//! PostgreSQL team repository implementation
//!
//! Teams are stored as JSONB documents alongside the columns that carry
//! unique constraints and filters. Participants get their own table whose
//! primary key is the user ID, which is what keeps a user in one team.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::team::{
    ApprovalStatus, PaymentProof, PaymentStatus, RegistrationNumber, Team, TeamId, TeamQuery,
    TeamRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::unique_violation;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merge `fields` into the stored document and status columns in one statement
    async fn patch(
        &self,
        id: &TeamId,
        approval_status: Option<ApprovalStatus>,
        payment_status: Option<PaymentStatus>,
        fields: serde_json::Value,
        updated_at: DateTime<Utc>,
    ) -> Result<Team, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE teams
            SET approval_status = COALESCE($2::TEXT, approval_status),
                payment_status = COALESCE($3::TEXT, payment_status),
                data = data || $4,
                updated_at = $5
            WHERE id = $1
            RETURNING data
            "#,
        )
        .bind(id.as_uuid())
        .bind(approval_status.map(|status| status.to_string()))
        .bind(payment_status.map(|status| status.to_string()))
        .bind(Json(fields))
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update team: {}", e)))?;

        match row {
            Some(row) => row_to_team(&row),
            None => Err(DomainError::not_found(format!("Team '{}' not found", id))),
        }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT data FROM teams WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT data FROM teams WHERE name_key = $1")
            .bind(crate::domain::team::team_name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by name: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn find_by_participant(&self, user_id: &UserId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT t.data FROM teams t
            JOIN team_participants p ON p.team_id = t.id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find team for user: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn participating_users(&self, user_ids: &[UserId]) -> Result<Vec<UserId>, DomainError> {
        let uuids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();

        let taken: Vec<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM team_participants WHERE user_id = ANY($1)")
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check team participants: {}", e))
                })?;

        Ok(taken.into_iter().map(UserId::from).collect())
    }

    async fn next_registration_number(&self) -> Result<RegistrationNumber, DomainError> {
        let counter: i64 = sqlx::query_scalar("SELECT nextval('team_registration_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to allocate registration number: {}", e))
            })?;

        Ok(RegistrationNumber::from_counter(counter as u64))
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name_key, registration_number, leader_id, approval_status,
                               payment_status, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name_key())
        .bind(team.registration_number().as_str())
        .bind(team.leader().as_uuid())
        .bind(team.approval_status().to_string())
        .bind(team.payment_status().to_string())
        .bind(Json(&team))
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| create_error(&team, e))?;

        for participant in team.participants() {
            sqlx::query("INSERT INTO team_participants (user_id, team_id) VALUES ($1, $2)")
                .bind(participant.as_uuid())
                .bind(team.id().as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| create_error(&team, e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit team: {}", e)))?;

        Ok(team)
    }

    async fn attach_payment_proof(
        &self,
        id: &TeamId,
        proof: PaymentProof,
    ) -> Result<Team, DomainError> {
        let now = Utc::now();
        let fields = json!({
            "payment_proof": proof,
            "payment_status": PaymentStatus::Pending,
            "updated_at": now,
        });

        self.patch(id, None, Some(PaymentStatus::Pending), fields, now)
            .await
    }

    async fn set_payment_status(
        &self,
        id: &TeamId,
        status: PaymentStatus,
    ) -> Result<Team, DomainError> {
        let now = Utc::now();
        let fields = json!({ "payment_status": status, "updated_at": now });

        self.patch(id, None, Some(status), fields, now).await
    }

    async fn set_approval_status(
        &self,
        id: &TeamId,
        status: ApprovalStatus,
    ) -> Result<Team, DomainError> {
        let now = Utc::now();
        let fields = json!({ "approval_status": status, "updated_at": now });

        self.patch(id, Some(status), None, fields, now).await
    }

    async fn list(&self, query: &TeamQuery) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT data FROM teams
            WHERE ($1::TEXT IS NULL OR approval_status = $1)
              AND ($2::TEXT IS NULL OR payment_status = $2)
            ORDER BY created_at DESC, LENGTH(registration_number) DESC, registration_number DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.approval_status.map(|s| s.to_string()))
        .bind(query.payment_status.map(|s| s.to_string()))
        .bind(query.limit.map(|l| l as i64))
        .bind(query.offset.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn count(&self, query: &TeamQuery) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM teams
            WHERE ($1::TEXT IS NULL OR approval_status = $1)
              AND ($2::TEXT IS NULL OR payment_status = $2)
            "#,
        )
        .bind(query.approval_status.map(|s| s.to_string()))
        .bind(query.payment_status.map(|s| s.to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as usize)
    }
}

fn create_error(team: &Team, error: sqlx::Error) -> DomainError {
    match unique_violation(&error).as_deref() {
        Some("teams_name_unique") => DomainError::conflict("Team name already exists"),
        Some("teams_registration_number_unique") => {
            DomainError::conflict("Registration number already exists")
        }
        Some("team_participants_user_unique") => {
            DomainError::conflict("One or more members are already part of another team")
        }
        Some(_) => DomainError::conflict(format!("Team '{}' already exists", team.id())),
        None => DomainError::storage(format!("Failed to create team: {}", error)),
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let Json(team): Json<Team> = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read team row: {}", e)))?;

    Ok(team)
}
