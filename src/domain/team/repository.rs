//! Team repository trait

use async_trait::async_trait;

use super::entity::{
    ApprovalStatus, PaymentProof, PaymentStatus, RegistrationNumber, Team, TeamId,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Query parameters for listing teams
#[derive(Debug, Clone, Default)]
pub struct TeamQuery {
    /// Filter by approval status
    pub approval_status: Option<ApprovalStatus>,
    /// Filter by payment status
    pub payment_status: Option<PaymentStatus>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Offset for pagination
    pub offset: Option<usize>,
}

impl TeamQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approval_status(mut self, status: ApprovalStatus) -> Self {
        self.approval_status = Some(status);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Check whether a team passes the filters
    pub fn matches(&self, team: &Team) -> bool {
        if let Some(status) = self.approval_status {
            if team.approval_status() != status {
                return false;
            }
        }

        if let Some(status) = self.payment_status {
            if team.payment_status() != status {
                return false;
            }
        }

        true
    }
}

/// Repository for teams
///
/// The repository is the single synchronization point for team invariants:
/// `create` must reject (with `DomainError::Conflict`) a duplicate team name
/// (case-insensitive), a duplicate registration number, or any participant
/// that already belongs to another team, atomically with the insert.
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Find a team by name (case-insensitive)
    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError>;

    /// Find the team a user leads or belongs to
    async fn find_by_participant(&self, user_id: &UserId) -> Result<Option<Team>, DomainError>;

    /// Return the users among `user_ids` that already lead or belong to a team
    async fn participating_users(&self, user_ids: &[UserId]) -> Result<Vec<UserId>, DomainError>;

    /// Atomically advance the registration counter and return the new number
    async fn next_registration_number(&self) -> Result<RegistrationNumber, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Store a new payment proof and reset the payment status to pending
    ///
    /// Only the proof, payment status and timestamp change; a concurrent
    /// approval decision is preserved.
    async fn attach_payment_proof(
        &self,
        id: &TeamId,
        proof: PaymentProof,
    ) -> Result<Team, DomainError>;

    /// Set the payment status of an existing team
    async fn set_payment_status(
        &self,
        id: &TeamId,
        status: PaymentStatus,
    ) -> Result<Team, DomainError>;

    /// Set the approval status of an existing team
    async fn set_approval_status(
        &self,
        id: &TeamId,
        status: ApprovalStatus,
    ) -> Result<Team, DomainError>;

    /// List teams matching the query, newest first
    async fn list(&self, query: &TeamQuery) -> Result<Vec<Team>, DomainError>;

    /// Count teams matching the query
    async fn count(&self, query: &TeamQuery) -> Result<usize, DomainError>;
}
