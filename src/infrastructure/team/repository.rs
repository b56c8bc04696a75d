//! In-memory team repository implementation

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::team::{
    ApprovalStatus, PaymentProof, PaymentStatus, RegistrationNumber, Team, TeamId, TeamQuery,
    TeamRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct TeamTables {
    teams: HashMap<TeamId, Team>,
    /// lower-cased name -> team ID
    name_index: HashMap<String, TeamId>,
    /// registration number -> team ID
    number_index: HashMap<String, TeamId>,
    /// leader or member -> team ID
    participant_index: HashMap<UserId, TeamId>,
    registration_counter: u64,
}

/// In-memory implementation of TeamRepository
///
/// Unique indexes and the registration counter share one lock, so every
/// check-and-insert in `create` is atomic.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    tables: RwLock<TeamTables>,
}

impl InMemoryTeamRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a field-level change to one stored team under the write lock
    async fn modify<F>(&self, id: &TeamId, change: F) -> Result<Team, DomainError>
    where
        F: FnOnce(&mut Team),
    {
        let mut tables = self.tables.write().await;
        let team = tables
            .teams
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))?;

        change(team);
        Ok(team.clone())
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let tables = self.tables.read().await;
        let key = crate::domain::team::team_name_key(name);

        Ok(tables
            .name_index
            .get(&key)
            .and_then(|id| tables.teams.get(id))
            .cloned())
    }

    async fn find_by_participant(&self, user_id: &UserId) -> Result<Option<Team>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .participant_index
            .get(user_id)
            .and_then(|id| tables.teams.get(id))
            .cloned())
    }

    async fn participating_users(&self, user_ids: &[UserId]) -> Result<Vec<UserId>, DomainError> {
        let tables = self.tables.read().await;

        Ok(user_ids
            .iter()
            .filter(|id| tables.participant_index.contains_key(id))
            .copied()
            .collect())
    }

    async fn next_registration_number(&self) -> Result<RegistrationNumber, DomainError> {
        let mut tables = self.tables.write().await;
        tables.registration_counter += 1;
        Ok(RegistrationNumber::from_counter(tables.registration_counter))
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.teams.contains_key(team.id()) {
            return Err(DomainError::conflict(format!(
                "Team with ID '{}' already exists",
                team.id()
            )));
        }

        let name_key = team.name_key();

        if tables.name_index.contains_key(&name_key) {
            return Err(DomainError::conflict("Team name already exists"));
        }

        if tables
            .number_index
            .contains_key(team.registration_number().as_str())
        {
            return Err(DomainError::conflict("Registration number already exists"));
        }

        let participants = team.participants();

        if participants
            .iter()
            .any(|id| tables.participant_index.contains_key(id))
        {
            return Err(DomainError::conflict(
                "One or more members are already part of another team",
            ));
        }

        tables.name_index.insert(name_key, *team.id());
        tables
            .number_index
            .insert(team.registration_number().to_string(), *team.id());

        for participant in participants {
            tables.participant_index.insert(participant, *team.id());
        }

        tables.teams.insert(*team.id(), team.clone());

        Ok(team)
    }

    async fn attach_payment_proof(
        &self,
        id: &TeamId,
        proof: PaymentProof,
    ) -> Result<Team, DomainError> {
        self.modify(id, |team| {
            team.attach_payment_proof(proof);
        })
        .await
    }

    async fn set_payment_status(
        &self,
        id: &TeamId,
        status: PaymentStatus,
    ) -> Result<Team, DomainError> {
        self.modify(id, |team| team.set_payment_status(status)).await
    }

    async fn set_approval_status(
        &self,
        id: &TeamId,
        status: ApprovalStatus,
    ) -> Result<Team, DomainError> {
        self.modify(id, |team| team.set_approval_status(status)).await
    }

    async fn list(&self, query: &TeamQuery) -> Result<Vec<Team>, DomainError> {
        let tables = self.tables.read().await;

        let mut result: Vec<Team> = tables
            .teams
            .values()
            .filter(|team| query.matches(team))
            .cloned()
            .collect();

        result.sort_by(newest_first);

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &TeamQuery) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.values().filter(|team| query.matches(team)).count())
    }
}

/// Newest first; the registration number breaks same-instant ties
fn newest_first(a: &Team, b: &Team) -> Ordering {
    let number = |team: &Team| {
        let value = team.registration_number().as_str();
        (value.len(), value.to_string())
    };

    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| number(b).cmp(&number(a)))
}
