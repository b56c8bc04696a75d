//! Payment infrastructure module

mod service;

pub use service::{PaymentWorkflow, ProofAttachment, DEFAULT_MAX_UPLOAD_BYTES};
