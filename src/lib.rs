//! # Audio Steganography
//!
//! Hide an image in the least significant bits of a WAV file's samples and get
//! it back losslessly.
//!
//! ## Modules
//!
//! - [`processing`]: the bit-level codec (header, capacity, fit-to-budget
//!   resizing, LSB embedding and extraction, image comparison)
//! - [`audio`]: WAV reading and writing
//! - [`raster`]: image decoding and encoding
//! - [`steganography`]: file-level operations behind the `steg` binary
//! - [`common`]: configuration
//! - [`utils`]: logging setup
//!
//! ## Example
//!
//! ```
//! use audio_steg::processing::{embed, extract, ImagePayload};
//!
//! let image = ImagePayload::new(2, 1, vec![255, 0, 0, 0, 0, 255])?;
//! let mut samples = vec![0i16; 1_000];
//!
//! embed(&mut samples, image.clone(), false)?;
//! let recovered = extract(&samples)?.into_image()?;
//!
//! assert_eq!(recovered, image);
//! # Ok::<(), audio_steg::StegError>(())
//! ```

pub mod audio;
pub mod common;
pub mod error;
pub mod processing;
pub mod raster;
pub mod steganography;
pub mod utils;

pub use error::{Result, StegError};
