//! Application state for shared services

use std::sync::Arc;

use crate::domain::{AdminRepository, ObjectStorage, TeamRepository, UserRepository};
use crate::infrastructure::admin::AdminService;
use crate::infrastructure::auth::{JwtGenerator, PasswordHasher};
use crate::infrastructure::image::ImagePipeline;
use crate::infrastructure::payment::PaymentWorkflow;
use crate::infrastructure::team::TeamRegistry;
use crate::infrastructure::user::UserService;

pub type DynUserService = UserService<dyn UserRepository, dyn PasswordHasher>;
pub type DynTeamRegistry = TeamRegistry<dyn TeamRepository, dyn UserRepository>;
pub type DynPaymentWorkflow = PaymentWorkflow<dyn TeamRepository, dyn ObjectStorage>;
pub type DynAdminService =
    AdminService<dyn AdminRepository, dyn TeamRepository, dyn UserRepository, dyn PasswordHasher>;

/// Persistence adapters selected at startup
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub admins: Arc<dyn AdminRepository>,
}

/// Application state containing shared services
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<DynUserService>,
    pub team_registry: Arc<DynTeamRegistry>,
    pub payment_workflow: Arc<DynPaymentWorkflow>,
    pub admin_service: Arc<DynAdminService>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Wire every service over the given adapters
    pub fn new(
        repositories: Repositories,
        object_storage: Arc<dyn ObjectStorage>,
        hasher: Arc<dyn PasswordHasher>,
        jwt_service: Arc<dyn JwtGenerator>,
        max_upload_bytes: u64,
    ) -> Self {
        let Repositories {
            users,
            teams,
            admins,
        } = repositories;

        let pipeline = Arc::new(ImagePipeline::new(object_storage));

        Self {
            user_service: Arc::new(UserService::new(users.clone(), hasher.clone())),
            team_registry: Arc::new(TeamRegistry::new(teams.clone(), users.clone())),
            payment_workflow: Arc::new(
                PaymentWorkflow::new(teams.clone(), pipeline).with_max_upload_bytes(max_upload_bytes),
            ),
            admin_service: Arc::new(AdminService::new(admins, teams, users, hasher)),
            jwt_service,
        }
    }
}
