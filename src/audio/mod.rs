//! # Audio Container Layer
//!
//! Reads and writes the WAV files that carry hidden images. The codec itself
//! only ever sees a flat [`SampleBuffer`](crate::processing::SampleBuffer);
//! this module turns files into sample buffers and back.

pub mod wav;

pub use crate::processing::samples::AudioSpec;
pub use wav::WavFile;
