//! Admin oversight: accounts, team review and statistics

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::admin::{validate_username, Admin, AdminId, AdminRepository, AdminRole};
use crate::domain::team::{ApprovalStatus, PaymentStatus, TeamId, TeamQuery, TeamRepository};
use crate::domain::user::{validate_password, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;
use crate::infrastructure::team::{load_team_view, load_team_views, TeamView};

/// Registration and payment counters for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub total_teams: usize,
    pub pending_payments: usize,
    pub verified_payments: usize,
    pub rejected_payments: usize,
    pub approved_teams: usize,
    pub total_users: usize,
    /// Percentage of teams with a verified payment, one decimal place
    pub payment_verification_rate: f64,
}

/// Percentage of `verified` over `total`, rounded to one decimal; 0 without teams
pub fn verification_rate(verified: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (verified as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Admin service
#[derive(Debug)]
pub struct AdminService<A, T, U, H>
where
    A: AdminRepository + ?Sized,
    T: TeamRepository + ?Sized,
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    admins: Arc<A>,
    teams: Arc<T>,
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<A, T, U, H> AdminService<A, T, U, H>
where
    A: AdminRepository + ?Sized,
    T: TeamRepository + ?Sized,
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(admins: Arc<A>, teams: Arc<T>, users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            admins,
            teams,
            users,
            hasher,
        }
    }

    /// Provision an admin account
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<Admin, DomainError> {
        let username = username.trim();
        validate_username(username)?;
        validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;
        let admin = self
            .admins
            .create(Admin::new(AdminId::generate(), username, password_hash, role))
            .await?;

        info!(
            admin_id = %admin.id(),
            username = %admin.username(),
            role = %admin.role(),
            "Created admin"
        );

        Ok(admin)
    }

    /// Check admin credentials and record the login
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Admin, DomainError> {
        let mut admin = self
            .admins
            .get_by_username(username.trim())
            .await?
            .filter(|admin| self.hasher.verify(password, admin.password_hash()))
            .ok_or_else(|| {
                warn!(username = %username, "Rejected admin login");
                DomainError::authentication("Invalid username or password")
            })?;

        admin.record_login();
        let admin = self.admins.update(&admin).await?;

        info!(admin_id = %admin.id(), "Admin logged in");

        Ok(admin)
    }

    /// Get an admin by ID
    pub async fn get(&self, id: &AdminId) -> Result<Admin, DomainError> {
        self.admins
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Admin '{}' not found", id)))
    }

    /// Replace an admin's password after verifying the current one
    pub async fn change_password(
        &self,
        id: &AdminId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut admin = self.get(id).await?;

        if !self.hasher.verify(current_password, admin.password_hash()) {
            return Err(DomainError::authentication("Current password is incorrect"));
        }

        validate_password(new_password)?;

        admin.set_password_hash(self.hasher.hash(new_password)?);
        self.admins.update(&admin).await?;

        info!(admin_id = %admin.id(), "Admin password changed");

        Ok(())
    }

    /// All teams, newest first
    pub async fn list_teams(&self) -> Result<Vec<TeamView>, DomainError> {
        let teams = self.teams.list(&TeamQuery::new()).await?;
        load_team_views(self.users.as_ref(), &teams).await
    }

    /// Set a team's payment status; any valid value is accepted from any state
    pub async fn set_payment_status(
        &self,
        team_id: &TeamId,
        status: &str,
    ) -> Result<TeamView, DomainError> {
        let status: PaymentStatus = status.parse()?;

        let team = self.teams.set_payment_status(team_id, status).await?;

        info!(team_id = %team_id, status = %status, "Payment status updated");

        load_team_view(self.users.as_ref(), &team).await
    }

    /// Set a team's approval status; any valid value is accepted from any state
    pub async fn set_approval_status(
        &self,
        team_id: &TeamId,
        status: &str,
    ) -> Result<TeamView, DomainError> {
        let status: ApprovalStatus = status.parse()?;

        let team = self.teams.set_approval_status(team_id, status).await?;

        info!(team_id = %team_id, status = %status, "Approval status updated");

        load_team_view(self.users.as_ref(), &team).await
    }

    /// Dashboard counters
    pub async fn compute_stats(&self) -> Result<TeamStats, DomainError> {
        let payments = |status| TeamQuery::new().with_payment_status(status);

        let total_teams = self.teams.count(&TeamQuery::new()).await?;
        let pending_payments = self.teams.count(&payments(PaymentStatus::Pending)).await?;
        let verified_payments = self.teams.count(&payments(PaymentStatus::Verified)).await?;
        let rejected_payments = self.teams.count(&payments(PaymentStatus::Rejected)).await?;
        let approved_teams = self
            .teams
            .count(&TeamQuery::new().with_approval_status(ApprovalStatus::Approved))
            .await?;
        let total_users = self.users.count().await?;

        Ok(TeamStats {
            total_teams,
            pending_payments,
            verified_payments,
            rejected_payments,
            approved_teams,
            total_users,
            payment_verification_rate: verification_rate(verified_payments, total_teams),
        })
    }
}
