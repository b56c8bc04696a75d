//! Team projection with participants resolved to display identities

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::team::{ApprovalStatus, PaymentStatus, SizeClass, Team};
use crate::domain::user::{UserId, UserRepository, UserSummary};
use crate::domain::DomainError;

/// A team as shown to participants and administrators
#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    pub id: String,
    pub team_name: String,
    pub leader: UserSummary,
    pub members: Vec<UserSummary>,
    pub problem_statement: String,
    pub size_class: SizeClass,
    pub approval_status: ApprovalStatus,
    pub registration_number: String,
    pub payment_screenshot: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamView {
    fn assemble(team: &Team, users: &HashMap<UserId, UserSummary>) -> Result<Self, DomainError> {
        let resolve = |id: &UserId, role: &str| {
            users.get(id).cloned().ok_or_else(|| {
                DomainError::internal(format!(
                    "{} '{}' of team '{}' does not exist",
                    role,
                    id,
                    team.id()
                ))
            })
        };

        let leader = resolve(team.leader(), "Leader")?;
        let members = team
            .members()
            .iter()
            .map(|id| resolve(id, "Member"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: team.id().to_string(),
            team_name: team.name().to_string(),
            leader,
            members,
            problem_statement: team.problem_statement().to_string(),
            size_class: team.size_class(),
            approval_status: team.approval_status(),
            registration_number: team.registration_number().to_string(),
            payment_screenshot: team.payment_proof().map(|proof| proof.url.clone()),
            payment_status: team.payment_status(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        })
    }
}

/// Resolve the participants of several teams with a single user lookup
pub async fn load_team_views<U: UserRepository + ?Sized>(
    users: &U,
    teams: &[Team],
) -> Result<Vec<TeamView>, DomainError> {
    let mut ids: Vec<UserId> = teams.iter().flat_map(Team::participants).collect();
    ids.sort();
    ids.dedup();

    let summaries: HashMap<UserId, UserSummary> = users
        .get_many(&ids)
        .await?
        .iter()
        .map(|user| (*user.id(), user.summary()))
        .collect();

    teams
        .iter()
        .map(|team| TeamView::assemble(team, &summaries))
        .collect()
}

/// Resolve the participants of one team
pub async fn load_team_view<U: UserRepository + ?Sized>(
    users: &U,
    team: &Team,
) -> Result<TeamView, DomainError> {
    let mut views = load_team_views(users, std::slice::from_ref(team)).await?;
    views
        .pop()
        .ok_or_else(|| DomainError::internal("Team projection is empty"))
}
