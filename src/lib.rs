//! Hackathon Registry
//!
//! Registration backend for a hackathon:
//! - Participant sign-up and team registration with size-class rules
//! - Payment screenshots compressed to WebP and kept in object storage
//! - Admin review of payments and approvals, with dashboard statistics

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use api::state::{AppState, Repositories};
use config::{ObjectStorageConfig, ObjectStorageProvider, StorageBackend, StorageConfig};
use domain::ObjectStorage;
use infrastructure::{
    admin::{InMemoryAdminRepository, PostgresAdminRepository},
    auth::{Argon2Hasher, JwtConfig, JwtService},
    object_storage::{CloudinaryConfig, CloudinaryStorage, InMemoryObjectStorage},
    storage::{connect_pool, run_migrations, PostgresConfig},
    team::{InMemoryTeamRepository, PostgresTeamRepository},
    user::{InMemoryUserRepository, PostgresUserRepository},
};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Create the application state with every service initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = create_repositories(&config.storage).await?;
    let object_storage = create_object_storage(&config.object_storage)?;

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set APP__AUTH__JWT_SECRET in production");
    }

    let jwt_service = JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    ));

    Ok(AppState::new(
        repositories,
        object_storage,
        Arc::new(Argon2Hasher::new()),
        Arc::new(jwt_service),
        config.uploads.max_bytes,
    ))
}

async fn create_repositories(config: &StorageConfig) -> anyhow::Result<Repositories> {
    info!(backend = ?config.backend, "Storage backend");

    match config.backend {
        StorageBackend::Memory => Ok(Repositories {
            users: Arc::new(InMemoryUserRepository::new()),
            teams: Arc::new(InMemoryTeamRepository::new()),
            admins: Arc::new(InMemoryAdminRepository::new()),
        }),
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .context("storage.database_url (or DATABASE_URL) is required for the postgres backend")?;

            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(
                &PostgresConfig::new(url).with_max_connections(config.max_connections),
            )
            .await?;

            let applied = run_migrations(&pool).await?;
            info!(applied, "PostgreSQL ready");

            Ok(Repositories {
                users: Arc::new(PostgresUserRepository::new(pool.clone())),
                teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
                admins: Arc::new(PostgresAdminRepository::new(pool)),
            })
        }
    }
}

fn create_object_storage(config: &ObjectStorageConfig) -> anyhow::Result<Arc<dyn ObjectStorage>> {
    info!(provider = ?config.provider, "Object storage provider");

    match config.provider {
        ObjectStorageProvider::Memory => {
            warn!("Payment screenshots are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryObjectStorage::new()))
        }
        ObjectStorageProvider::Cloudinary => {
            let mut cloudinary = CloudinaryConfig::new(
                config.cloud_name.clone(),
                config.api_key.clone(),
                config.api_secret.clone(),
            )
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_signature_algorithm(config.signature_algorithm);

            if !config.folder.is_empty() {
                cloudinary = cloudinary.with_folder(config.folder.clone());
            }

            Ok(Arc::new(CloudinaryStorage::new(cloudinary)?))
        }
    }
}
