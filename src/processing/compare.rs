//! Pixel-by-pixel comparison of two RGB images.
//!
//! Used to check that an extracted image matches the one that was hidden.

use serde::Serialize;

use crate::processing::payload::ImagePayload;

/// Reason reported when the two images have different shapes.
pub const DIMENSION_MISMATCH: &str = "dimension mismatch";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub identical: bool,
    /// Percentage of pixels that are equal, `0.0..=100.0`.
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub different_pixels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pixels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Compares `a` and `b` one 3-byte pixel at a time.
///
/// Images of different dimensions are not compared at all and score 0.
pub fn compare(a: &ImagePayload, b: &ImagePayload) -> ComparisonResult {
    if a.dimensions() != b.dimensions() {
        return ComparisonResult {
            identical: false,
            similarity: 0.0,
            different_pixels: None,
            total_pixels: None,
            reason: Some(DIMENSION_MISMATCH.to_string()),
        };
    }

    let total_pixels = a.pixel_count();
    let different_pixels = a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count();

    let similarity = if total_pixels == 0 {
        100.0
    } else {
        (total_pixels - different_pixels) as f64 / total_pixels as f64 * 100.0
    };

    ComparisonResult {
        identical: different_pixels == 0,
        similarity,
        different_pixels: Some(different_pixels),
        total_pixels: Some(total_pixels),
        reason: None,
    }
}
