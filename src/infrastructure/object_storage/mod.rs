//! Object storage adapters for uploaded payment proofs

mod cloudinary;
mod in_memory;

pub use cloudinary::{sign_params, CloudinaryConfig, CloudinaryStorage, SignatureAlgorithm};
pub use in_memory::InMemoryObjectStorage;
