//! Raw RGB image payload exchanged between the codec and the image layer.

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StegError};

/// Bytes per pixel in the hidden stream. Always RGB, no alpha.
pub const BYTES_PER_PIXEL: usize = 3;

/// Row-major RGB pixels with their dimensions.
///
/// # Invariants
/// - `width > 0` and `height > 0`
/// - `data.len() == width * height * 3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImagePayload {
    /// Wraps an RGB buffer, checking it against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as u64 * height as u64).saturating_mul(BYTES_PER_PIXEL as u64);

        if width == 0 || height == 0 || data.len() as u64 != expected {
            return Err(StegError::InvalidPayload {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGB bytes in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / BYTES_PER_PIXEL
    }

    /// Iterates over 3-byte pixel tuples.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(BYTES_PER_PIXEL)
    }

    /// Resamples to the given dimensions with the image library.
    pub fn resampled(&self, width: u32, height: u32, filter: ResampleFilter) -> Result<Self> {
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }

        let resized = imageops::resize(&self.to_rgb_image()?, width, height, filter.into());
        Ok(Self::from(resized))
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            StegError::InvalidPayload {
                width: self.width,
                height: self.height,
                expected: (self.width as u64 * self.height as u64)
                    .saturating_mul(BYTES_PER_PIXEL as u64),
                actual: self.data.len(),
            },
        )
    }
}

impl From<RgbImage> for ImagePayload {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// Resampling filter used when an image is shrunk to fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
