//! Payment workflow: attaching proofs and resetting verification state

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::domain::payment::{ObjectStorage, ProcessedProof};
use crate::domain::team::{PaymentProof, Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::image::ImagePipeline;

/// Default upper bound for an uploaded screenshot (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Team state after a successful upload plus what the pipeline did
#[derive(Debug, Clone)]
pub struct ProofAttachment {
    pub team: Team,
    pub proof: ProcessedProof,
}

/// Payment workflow service
#[derive(Debug)]
pub struct PaymentWorkflow<T: TeamRepository + ?Sized, S: ObjectStorage + ?Sized> {
    teams: Arc<T>,
    pipeline: Arc<ImagePipeline<S>>,
    max_upload_bytes: u64,
}

impl<T, S> PaymentWorkflow<T, S>
where
    T: TeamRepository + ?Sized,
    S: ObjectStorage + ?Sized + 'static,
{
    pub fn new(teams: Arc<T>, pipeline: Arc<ImagePipeline<S>>) -> Self {
        Self {
            teams,
            pipeline,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Replace the team's payment proof with a freshly processed screenshot
    ///
    /// The payment status always returns to `pending`. A superseded proof is
    /// deleted in the background and its outcome only logged.
    pub async fn attach_payment_proof(
        &self,
        team_id: &TeamId,
        requester: &UserId,
        raw: Bytes,
        original_byte_size: u64,
    ) -> Result<ProofAttachment, DomainError> {
        let team = self
            .teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))?;

        if !team.has_participant(requester) {
            warn!(team_id = %team_id, user_id = %requester, "Payment upload by non-member");
            return Err(DomainError::forbidden("You are not a member of this team"));
        }

        if raw.is_empty() || original_byte_size == 0 {
            return Err(DomainError::validation("Payment screenshot is required"));
        }

        if original_byte_size > self.max_upload_bytes {
            return Err(DomainError::validation(format!(
                "Payment screenshot exceeds the maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }

        if let Some(previous) = team.payment_proof() {
            let pipeline = Arc::clone(&self.pipeline);
            let handle = previous.storage_handle.clone();
            tokio::spawn(async move {
                pipeline.delete_proof(&handle).await;
            });
        }

        let proof = self
            .pipeline
            .process_payment_proof(raw, original_byte_size, team_id)
            .await?;

        let team = self
            .teams
            .attach_payment_proof(
                team_id,
                PaymentProof::new(proof.storage_url.clone(), proof.storage_handle.clone()),
            )
            .await?;

        info!(
            team_id = %team_id,
            user_id = %requester,
            compression_ratio = proof.compression_ratio,
            "Payment proof attached"
        );

        Ok(ProofAttachment { team, proof })
    }
}
