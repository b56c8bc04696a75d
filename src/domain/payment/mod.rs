//! Payment proof domain
//!
//! The object-storage contract used to hold payment screenshots and the
//! figures reported after a proof has been compressed and stored.

mod proof;
mod storage;

pub use proof::{compression_ratio, ProcessedProof};
pub use storage::{ObjectMetadata, ObjectStorage, StoredObject};

#[cfg(test)]
pub use storage::MockObjectStorage;
