use serde::Deserialize;

use crate::infrastructure::object_storage::SignatureAlgorithm;

/// Application configuration
///
/// Layered from `config/default`, `config/local` and `APP__*` environment
/// variables (e.g. `APP__STORAGE__BACKEND=postgres`). Every section has
/// defaults so the server starts with no files present.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub object_storage: ObjectStorageConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStorageProvider {
    #[default]
    Memory,
    Cloudinary,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ObjectStorageConfig {
    pub provider: ObjectStorageProvider,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub timeout_secs: u64,
    pub signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted payment screenshot in bytes
    pub max_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_expiration_hours: 24,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[hidden]")
            .field("token_expiration_hours", &self.token_expiration_hours)
            .finish()
    }
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            provider: ObjectStorageProvider::default(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: String::new(),
            timeout_secs: 30,
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }
}

impl std::fmt::Debug for ObjectStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorageConfig")
            .field("provider", &self.provider)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[hidden]")
            .field("folder", &self.folder)
            .field("timeout_secs", &self.timeout_secs)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.object_storage.provider, ObjectStorageProvider::Memory);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.auth.token_expiration_hours, 24);
        assert_eq!(
            config.object_storage.signature_algorithm,
            SignatureAlgorithm::Sha1
        );
    }

    #[test]
    fn test_signature_algorithm_override() {
        let config: AppConfig = config::Config::builder()
            .set_override("object_storage.signature_algorithm", "sha256")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(
            config.object_storage.signature_algorithm,
            SignatureAlgorithm::Sha256
        );
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("storage.backend", "postgres")
            .unwrap()
            .set_override("server.port", 9090)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 10);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "jwt-secret-value".to_string();
        config.object_storage.api_secret = "cloud-secret-value".to_string();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("jwt-secret-value"));
        assert!(!debug.contains("cloud-secret-value"));
    }
}
