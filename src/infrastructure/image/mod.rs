//! Image processing infrastructure
//!
//! Compression of payment screenshots to WebP and their upload through the
//! configured object storage.

mod compressor;
mod pipeline;

pub use compressor::{compress_to_webp, CompressedImage, MAX_DIMENSION};
pub use pipeline::{proof_key, ImagePipeline};
