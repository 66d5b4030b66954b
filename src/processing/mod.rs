//! # Steganography Core
//!
//! The bit-level codec that hides an RGB image in audio sample LSBs.
//!
//! ## Modules
//!
//! - [`header`]: the fixed 12-byte `(width, height, data_size)` record
//! - [`capacity`]: payload bytes a sample count can carry
//! - [`fit`]: aspect-preserving shrink of oversized images to a byte budget
//! - [`lsb`]: embedding and extraction
//! - [`compare`]: pixel-by-pixel image comparison
//! - [`payload`]: validated RGB buffers
//! - [`samples`]: sample types and buffers

pub mod capacity;
pub mod compare;
pub mod fit;
pub mod header;
pub mod lsb;
pub mod payload;
pub mod samples;

// Re-export main types for convenience
pub use capacity::{capacity_bytes, CapacityReport};
pub use compare::{compare, ComparisonResult};
pub use fit::{fit_dimensions, fit_image, FitResult};
pub use header::{Header, HEADER_BITS, HEADER_LEN};
pub use lsb::{embed, extract, EmbedReport, Extracted, LsbCodec, SizeMismatch, MAX_DIMENSION};
pub use payload::{ImagePayload, ResampleFilter};
pub use samples::{AudioSpec, Sample, SampleBuffer};
