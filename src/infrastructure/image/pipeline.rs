//! Payment proof pipeline: compress on the blocking pool, then upload

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::payment::{compression_ratio, ObjectMetadata, ObjectStorage, ProcessedProof};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

use super::compressor::compress_to_webp;

const KEY_PREFIX: &str = "payment_proofs";
const KEY_SUFFIX_LEN: usize = 8;

/// Turns raw screenshots into stored WebP assets
#[derive(Debug)]
pub struct ImagePipeline<S: ObjectStorage + ?Sized> {
    storage: Arc<S>,
}

impl<S: ObjectStorage + ?Sized> ImagePipeline<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Compress and upload a payment screenshot for `team_id`
    pub async fn process_payment_proof(
        &self,
        raw: Bytes,
        original_byte_size: u64,
        team_id: &TeamId,
    ) -> Result<ProcessedProof, DomainError> {
        let compressed = tokio::task::spawn_blocking(move || compress_to_webp(&raw))
            .await
            .map_err(|e| DomainError::internal(format!("Image compression task failed: {}", e)))??;

        let key = proof_key(team_id);
        let metadata = ObjectMetadata::from([
            ("team_id".to_string(), team_id.to_string()),
            ("original_size".to_string(), original_byte_size.to_string()),
            ("format".to_string(), "webp".to_string()),
        ]);

        debug!(
            team_id = %team_id,
            key = %key,
            encoded_bytes = compressed.bytes.len(),
            "Uploading payment proof"
        );

        let stored = self
            .storage
            .put(Bytes::from(compressed.bytes), &key, &metadata)
            .await?;

        let ratio = compression_ratio(original_byte_size, stored.stored_byte_size);

        info!(
            team_id = %team_id,
            provider = self.storage.provider(),
            original_bytes = original_byte_size,
            compressed_bytes = stored.stored_byte_size,
            compression_ratio = ratio,
            "Stored payment proof"
        );

        Ok(ProcessedProof {
            storage_url: stored.url,
            storage_handle: stored.handle,
            original_byte_size,
            compressed_byte_size: stored.stored_byte_size,
            compression_ratio: ratio,
            width: compressed.width,
            height: compressed.height,
        })
    }

    /// Best-effort removal of a stored proof; failures are logged, never returned
    pub async fn delete_proof(&self, storage_handle: &str) -> bool {
        match self.storage.delete(storage_handle).await {
            Ok(true) => {
                debug!(handle = %storage_handle, "Deleted payment proof");
                true
            }
            Ok(false) => {
                warn!(handle = %storage_handle, "Payment proof was not found at provider");
                false
            }
            Err(e) => {
                warn!(handle = %storage_handle, error = %e, "Failed to delete payment proof");
                false
            }
        }
    }
}

/// `payment_proofs/team_<id>_<unix millis>_<8 alphanumerics>`
pub fn proof_key(team_id: &TeamId) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}/team_{}_{}_{}",
        KEY_PREFIX,
        team_id,
        Utc::now().timestamp_millis(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{MockObjectStorage, StoredObject};
    use crate::infrastructure::image::compressor::tests::png_bytes;
    use mockall::predicate::eq;

    #[test]
    fn test_proof_key_format() {
        let team_id = TeamId::generate();
        let key = proof_key(&team_id);

        let prefix = format!("payment_proofs/team_{}_", team_id);
        assert!(key.starts_with(&prefix));

        let rest = &key[prefix.len()..];
        let (millis, suffix) = rest.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_process_uploads_webp_with_metadata() {
        let team_id = TeamId::generate();
        let raw = png_bytes(1600, 800);
        let original = raw.len() as u64;
        let expected_team = team_id.to_string();

        let mut storage = MockObjectStorage::new();
        storage.expect_provider().return_const("mock");
        storage
            .expect_put()
            .withf(move |bytes, key, metadata| {
                &bytes[0..4] == b"RIFF"
                    && key.starts_with("payment_proofs/team_")
                    && metadata.get("team_id") == Some(&expected_team)
                    && metadata.get("original_size") == Some(&original.to_string())
                    && metadata.get("format").map(String::as_str) == Some("webp")
            })
            .times(1)
            .returning(|bytes, key, _| {
                Ok(StoredObject {
                    url: format!("https://cdn.example.com/{}.webp", key),
                    handle: key.to_string(),
                    stored_byte_size: bytes.len() as u64,
                })
            });

        let pipeline = ImagePipeline::new(Arc::new(storage));
        let proof = pipeline
            .process_payment_proof(Bytes::from(raw), original, &team_id)
            .await
            .unwrap();

        assert_eq!((proof.width, proof.height), (1200, 600));
        assert_eq!(proof.original_byte_size, original);
        assert_eq!(
            proof.compression_ratio,
            compression_ratio(original, proof.compressed_byte_size)
        );
        assert!(proof.storage_url.ends_with(".webp"));
    }

    #[tokio::test]
    async fn test_invalid_image_never_reaches_storage() {
        let mut storage = MockObjectStorage::new();
        storage.expect_put().never();

        let pipeline = ImagePipeline::new(Arc::new(storage));
        let result = pipeline
            .process_payment_proof(Bytes::from_static(b"not an image"), 12, &TeamId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_upload_failure_propagates() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_put()
            .returning(|_, _, _| Err(DomainError::dependency("mock", "upstream unavailable")));

        let pipeline = ImagePipeline::new(Arc::new(storage));
        let result = pipeline
            .process_payment_proof(Bytes::from(png_bytes(10, 10)), 100, &TeamId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Dependency { .. })));
    }

    #[tokio::test]
    async fn test_delete_proof_swallows_errors() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .with(eq("gone"))
            .returning(|_| Err(DomainError::dependency("mock", "timeout")));
        storage
            .expect_delete()
            .with(eq("present"))
            .returning(|_| Ok(true));

        let pipeline = ImagePipeline::new(Arc::new(storage));

        assert!(!pipeline.delete_proof("gone").await);
        assert!(pipeline.delete_proof("present").await);
    }
}
