//! Processed payment proof

use serde::Serialize;

/// Outcome of compressing and storing a payment screenshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedProof {
    pub storage_url: String,
    pub storage_handle: String,
    pub original_byte_size: u64,
    pub compressed_byte_size: u64,
    /// Percentage of bytes saved, two decimals
    pub compression_ratio: f64,
    pub width: u32,
    pub height: u32,
}

/// Percentage of bytes saved relative to the original, rounded to two decimals
///
/// Returns 0 for an empty original. Negative when the output grew.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }

    let saved = original as f64 - compressed as f64;
    (saved / original as f64 * 100.0 * 100.0).round() / 100.0
}
