//! Admin provisioning command

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::admin::AdminRole;

#[derive(Debug, Args)]
pub struct CreateAdminArgs {
    /// Login name of the new administrator
    #[arg(long)]
    pub username: String,

    /// Initial password (8-128 characters)
    #[arg(long)]
    pub password: String,

    /// Grant the superadmin role
    #[arg(long)]
    pub superadmin: bool,
}

impl CreateAdminArgs {
    fn role(&self) -> AdminRole {
        if self.superadmin {
            AdminRole::Superadmin
        } else {
            AdminRole::Admin
        }
    }
}

/// Create an administrator in the configured store
pub async fn run(config: &AppConfig, args: CreateAdminArgs) -> anyhow::Result<()> {
    let state = crate::create_app_state(config).await?;

    let admin = state
        .admin_service
        .create_admin(&args.username, &args.password, args.role())
        .await?;

    info!(admin_id = %admin.id(), username = %admin.username(), role = %admin.role(), "Admin account ready");

    Ok(())
}
