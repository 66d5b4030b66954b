//! # Error Types
//!
//! Every fatal condition in the codec and its I/O boundary is a variant of
//! [`StegError`]. Variants carry the concrete numbers involved (needed vs.
//! available, declared vs. expected) so the command-line layer can print an
//! actionable message.
//!
//! Non-fatal conditions are not errors:
//! - a header whose byte count disagrees with `width * height * 3` is reported
//!   through [`SizeMismatch`](crate::processing::lsb::SizeMismatch)
//! - images of different shapes yield a zero-similarity
//!   [`ComparisonResult`](crate::processing::compare::ComparisonResult)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StegError {
    /// Sample width outside {1, 2, 4} bytes. Raised before the codec runs.
    #[error("unsupported sample width: {sample_width} bytes (expected 1, 2 or 4)")]
    UnsupportedFormat { sample_width: u16 },

    /// Payload does not fit the sample budget, even after any auto-fit attempt.
    ///
    /// Both numbers are payload bytes; `available` excludes the header and may
    /// be negative for very short streams.
    #[error(
        "image too large: payload needs {needed} bytes but only {available} bytes are available; \
         use a smaller image, a longer audio file, or enable auto-resize"
    )]
    CapacityExceeded { needed: u64, available: i64 },

    /// Decoded header fields are out of range. Usually means the stream holds
    /// no hidden image at all.
    #[error(
        "invalid header ({width}x{height}, {data_size} bytes): no hidden image found or data is corrupted"
    )]
    CorruptHeader { width: u32, height: u32, data_size: u32 },

    /// The header declares more payload than the stream has samples for.
    #[error("not enough samples to extract image: need {needed}, have {available}")]
    TruncatedStream { needed: u64, available: usize },

    /// RGB buffer does not match its declared dimensions.
    #[error("invalid RGB payload: {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidPayload {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },

    /// Malformed RIFF/WAVE container.
    #[error("invalid WAV file: {0}")]
    InvalidWav(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StegError>;
