//! # Fit-to-Budget Resizing
//!
//! Computes new dimensions for an RGB image that is too large for a byte
//! budget, keeping its aspect ratio.
//!
//! ## Algorithm
//!
//! 1. `max_pixels = max_bytes / 3`
//! 2. `aspect = width / height`
//! 3. `new_height = floor(sqrt(max_pixels / aspect))`, `new_width = floor(new_height * aspect)`
//! 4. While `new_width * new_height * 3 > max_bytes`, decrement `new_width` and
//!    recompute `new_height = floor(new_width / aspect)`.
//!
//! The correction loop walks down from the square-root estimate and stops at the
//! first pair that fits. It does not search for the largest valid pair, and
//! byte counts downstream depend on exactly this policy.
//!
//! Pixel resampling is left to the `image` crate; see [`fit_image`].

use log::{debug, info};
use serde::Serialize;

use crate::error::{Result, StegError};
use crate::processing::payload::{ImagePayload, ResampleFilter, BYTES_PER_PIXEL};

/// Outcome of one resize decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub resized: bool,
    pub original_dims: (u32, u32),
    pub final_dims: (u32, u32),
    pub original_bytes: u64,
    pub final_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_percent: Option<f64>,
}

impl FitResult {
    fn unchanged(dims: (u32, u32), bytes: u64) -> Self {
        Self {
            resized: false,
            original_dims: dims,
            final_dims: dims,
            original_bytes: bytes,
            final_bytes: bytes,
            reduction_percent: None,
        }
    }
}

/// `None` when the byte count does not fit in a `u64`.
fn rgb_bytes(width: u64, height: u64) -> Option<u64> {
    width.checked_mul(height)?.checked_mul(BYTES_PER_PIXEL as u64)
}

/// Computes dimensions for a `width` x `height` RGB image so that it fits in
/// `max_bytes`.
///
/// Returns an unchanged result when the image already fits.
///
/// # Errors
/// [`StegError::CapacityExceeded`] when the budget cannot hold a single pixel,
/// when the search ends with a zero dimension, or when the image's byte count
/// overflows a `u64`.
pub fn fit_dimensions(width: u32, height: u32, max_bytes: i64) -> Result<FitResult> {
    let original_bytes =
        rgb_bytes(width as u64, height as u64).ok_or(StegError::CapacityExceeded {
            needed: u64::MAX,
            available: max_bytes,
        })?;

    if (original_bytes as i128) <= max_bytes as i128 {
        return Ok(FitResult::unchanged((width, height), original_bytes));
    }

    let too_small = StegError::CapacityExceeded {
        needed: BYTES_PER_PIXEL as u64,
        available: max_bytes,
    };

    if max_bytes < BYTES_PER_PIXEL as i64 || width == 0 || height == 0 {
        return Err(too_small);
    }

    let budget = max_bytes as u64;
    let max_pixels = budget / BYTES_PER_PIXEL as u64;
    let aspect = width as f64 / height as f64;

    let mut new_height = (max_pixels as f64 / aspect).sqrt() as u64;
    let mut new_width = (new_height as f64 * aspect) as u64;

    // new_width >= 1 whenever the product is non-zero, so this cannot underflow
    while rgb_bytes(new_width, new_height).map_or(true, |bytes| bytes > budget) {
        new_width -= 1;
        new_height = (new_width as f64 / aspect) as u64;
        debug!("fit correction step: {}x{}", new_width, new_height);
    }

    if new_width == 0 || new_height == 0 {
        return Err(too_small);
    }

    // the loop above guarantees this product is at most `budget`
    let final_bytes = new_width * new_height * BYTES_PER_PIXEL as u64;
    let reduction = (original_bytes - final_bytes) as f64 / original_bytes as f64 * 100.0;

    Ok(FitResult {
        resized: true,
        original_dims: (width, height),
        final_dims: (new_width as u32, new_height as u32),
        original_bytes,
        final_bytes,
        reduction_percent: Some(reduction),
    })
}

/// Shrinks `image` to fit `max_bytes`, resampling with `filter`.
///
/// The image is returned as-is when it already fits.
pub fn fit_image(
    image: &ImagePayload,
    max_bytes: i64,
    filter: ResampleFilter,
) -> Result<(ImagePayload, FitResult)> {
    let (width, height) = image.dimensions();
    let fit = fit_dimensions(width, height, max_bytes)?;

    if !fit.resized {
        return Ok((image.clone(), fit));
    }

    info!(
        "Image too large ({} bytes). Auto-resizing to fit {} bytes...",
        fit.original_bytes, max_bytes
    );

    let (new_width, new_height) = fit.final_dims;
    let resized = image.resampled(new_width, new_height, filter)?;

    info!("Resized to: {}x{} pixels", new_width, new_height);

    Ok((resized, fit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_fitting_image_is_untouched() {
        let fit = fit_dimensions(100, 100, 30_000).unwrap();

        assert!(!fit.resized);
        assert_eq!(fit.final_dims, (100, 100));
        assert_eq!(fit.final_bytes, 30_000);
        assert_eq!(fit.reduction_percent, None);
    }

    #[test]
    fn test_known_dimensions() {
        assert_eq!(fit_dimensions(100, 100, 29_999).unwrap().final_dims, (99, 99));
        assert_eq!(fit_dimensions(200, 100, 30_000).unwrap().final_dims, (140, 70));
        assert_eq!(fit_dimensions(640, 480, 55_113).unwrap().final_dims, (156, 117));
    }

    #[test]
    fn test_reduction_percent() {
        let fit = fit_dimensions(200, 100, 30_000).unwrap();

        assert_eq!(fit.original_bytes, 60_000);
        assert_eq!(fit.final_bytes, 29_400);
        let reduction = fit.reduction_percent.unwrap();
        assert!((reduction - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_below_one_pixel_is_fatal() {
        for budget in [-12, 0, 2] {
            let err = fit_dimensions(100, 100, budget).unwrap_err();
            assert!(matches!(err, StegError::CapacityExceeded { needed: 3, .. }));
        }
    }

    #[test]
    fn test_degenerate_aspect_is_fatal() {
        // A 1000:1 strip cannot keep its aspect ratio in ten pixels.
        assert!(matches!(
            fit_dimensions(1000, 1, 30),
            Err(StegError::CapacityExceeded { .. })
        ));
        assert!(matches!(
            fit_dimensions(1, 1000, 30),
            Err(StegError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_oversized_dimensions_do_not_overflow() {
        assert!(matches!(
            fit_dimensions(u32::MAX, u32::MAX, 1_000),
            Err(StegError::CapacityExceeded {
                needed: u64::MAX,
                available: 1_000,
            })
        ));

        let fit = fit_dimensions(100_000, 100_000, 30_000).unwrap();
        assert_eq!(fit.original_bytes, 30_000_000_000);
        assert_eq!(fit.final_dims, (100, 100));
    }

    #[test]
    fn test_fit_satisfies_budget_and_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..2_000 {
            let width = rng.gen_range(1..4_000);
            let height = rng.gen_range(1..4_000);
            let budget = rng.gen_range(3..5_000_000i64);

            let Ok(fit) = fit_dimensions(width, height, budget) else {
                continue;
            };
            let (w, h) = fit.final_dims;

            assert!(w > 0 && h > 0);
            assert!(rgb_bytes(w as u64, h as u64).unwrap() as i64 <= budget);

            let again = fit_dimensions(w, h, budget).unwrap();
            assert!(!again.resized);
            assert_eq!(again.final_dims, fit.final_dims);
        }
    }

    #[test]
    fn test_fit_image_resamples() {
        let image = ImagePayload::new(64, 32, vec![200; 64 * 32 * 3]).unwrap();
        let (resized, fit) = fit_image(&image, 1_500, ResampleFilter::Lanczos3).unwrap();

        assert!(fit.resized);
        assert_eq!(resized.dimensions(), fit.final_dims);
        assert!(resized.byte_len() <= 1_500);
    }
}
