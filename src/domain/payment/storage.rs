//! Object storage collaborator contract

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Metadata attached to an uploaded object (sorted for deterministic signing)
pub type ObjectMetadata = BTreeMap<String, String>;

/// Result of storing an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Public URL of the stored asset
    pub url: String,
    /// Opaque handle used to delete the asset later
    pub handle: String,
    /// Size reported by the provider
    pub stored_byte_size: u64,
}

/// External object storage for uploaded assets
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug {
    /// Provider name used in logs and dependency errors
    fn provider(&self) -> &'static str;

    /// Store `bytes` under `key`
    async fn put(
        &self,
        bytes: Bytes,
        key: &str,
        metadata: &ObjectMetadata,
    ) -> Result<StoredObject, DomainError>;

    /// Delete the object behind `handle`, returning whether the provider removed it
    async fn delete(&self, handle: &str) -> Result<bool, DomainError>;
}
