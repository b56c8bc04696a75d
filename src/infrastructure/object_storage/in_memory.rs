//! In-memory object storage

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::payment::{ObjectMetadata, ObjectStorage, StoredObject};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Bytes,
    metadata: ObjectMetadata,
}

/// Object storage kept in process memory; handles are the object keys
#[derive(Debug, Default)]
pub struct InMemoryObjectStorage {
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Whether an object with this handle is present
    pub async fn contains(&self, handle: &str) -> bool {
        self.objects.read().await.contains_key(handle)
    }

    /// Stored bytes of an object
    pub async fn get(&self, handle: &str) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(handle)
            .map(|blob| blob.bytes.clone())
    }

    /// Metadata stored alongside an object
    pub async fn metadata(&self, handle: &str) -> Option<ObjectMetadata> {
        self.objects
            .read()
            .await
            .get(handle)
            .map(|blob| blob.metadata.clone())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    fn provider(&self) -> &'static str {
        "memory"
    }

    async fn put(
        &self,
        bytes: Bytes,
        key: &str,
        metadata: &ObjectMetadata,
    ) -> Result<StoredObject, DomainError> {
        let stored_byte_size = bytes.len() as u64;

        self.objects.write().await.insert(
            key.to_string(),
            StoredBlob {
                bytes,
                metadata: metadata.clone(),
            },
        );

        Ok(StoredObject {
            url: format!("memory://{}", key),
            handle: key.to_string(),
            stored_byte_size,
        })
    }

    async fn delete(&self, handle: &str) -> Result<bool, DomainError> {
        Ok(self.objects.write().await.remove(handle).is_some())
    }
}
