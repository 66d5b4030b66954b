//! # LSB Embedding and Extraction
//!
//! Hides an RGB image in the least significant bits of an audio sample stream.
//!
//! ## Stream Layout
//!
//! | samples               | content                                   |
//! |-----------------------|-------------------------------------------|
//! | `0..96`               | [`Header`]: width, height, data size (LE) |
//! | `96..96 + size * 8`   | RGB bytes, row-major, 3 bytes per pixel   |
//!
//! Every sample carries exactly one bit in bit 0. Bytes are walked LSB-first:
//! bit 0 of a byte goes into the first of its eight samples. Samples past the
//! payload are left untouched.
//!
//! ## Capacity
//! A stream of `n` samples holds `n / 8 - 12` payload bytes, see
//! [`capacity_bytes`].

use log::{debug, warn};
use serde::Serialize;

use crate::error::{Result, StegError};
use crate::processing::capacity::capacity_bytes;
use crate::processing::fit::{fit_image, FitResult};
use crate::processing::header::{Header, HEADER_BITS, HEADER_LEN};
use crate::processing::payload::{ImagePayload, ResampleFilter};
use crate::processing::samples::{Sample, SampleBuffer};

/// Largest width or height accepted from a decoded header.
pub const MAX_DIMENSION: u32 = 10_000;

/// Header declared a byte count other than `width * height * 3`.
///
/// Extraction still reads the declared number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeMismatch {
    pub declared: u32,
    pub expected: u64,
}

/// Summary of a successful embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedReport {
    /// Dimensions actually written, after any auto-fit.
    pub image_size: (u32, u32),
    pub data_bytes: usize,
    /// Header plus payload bits, one sample each.
    pub total_bits: u64,
    pub total_samples: usize,
    /// `total_bits / total_samples * 100`
    pub capacity_usage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitResult>,
}

/// Header and raw payload bytes recovered from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub header: Header,
    /// Exactly `header.data_size` bytes.
    pub data: Vec<u8>,
    pub size_mismatch: Option<SizeMismatch>,
}

impl Extracted {
    /// Materializes the recovered bytes as an image.
    ///
    /// With a size mismatch the first `width * height * 3` bytes are used;
    /// when fewer bytes were declared this fails with
    /// [`StegError::InvalidPayload`].
    pub fn image(&self) -> Result<ImagePayload> {
        let expected = self.header.expected_size();
        let take = expected.min(self.data.len() as u64) as usize;

        ImagePayload::new(
            self.header.width,
            self.header.height,
            self.data[..take].to_vec(),
        )
    }

    pub fn into_image(self) -> Result<ImagePayload> {
        if self.size_mismatch.is_none() {
            return ImagePayload::new(self.header.width, self.header.height, self.data);
        }
        self.image()
    }
}

/// Embedding and extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbCodec {
    /// Shrink oversized images to the available capacity instead of failing.
    pub auto_fit: bool,
    pub filter: ResampleFilter,
    /// Header dimensions above this are rejected as corrupt.
    pub max_dimension: u32,
}

impl Default for LsbCodec {
    fn default() -> Self {
        Self {
            auto_fit: false,
            filter: ResampleFilter::default(),
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl LsbCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_fit(mut self, auto_fit: bool) -> Self {
        self.auto_fit = auto_fit;
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Writes `image` into the LSBs of `samples`.
    ///
    /// The buffer is modified in place; on error its contents are unspecified
    /// and it should be discarded.
    ///
    /// # Errors
    /// [`StegError::CapacityExceeded`] when the image does not fit and auto-fit
    /// is off, or when even the fitted image cannot be written.
    pub fn embed<S: Sample>(&self, samples: &mut [S], mut image: ImagePayload) -> Result<EmbedReport> {
        let total_samples = samples.len();
        let mut fit = None;

        let mut total_bits = embedded_bits(image.byte_len());
        debug!("total bits to hide: {} (including header)", total_bits);

        if total_bits > total_samples as u64 {
            let available = capacity_bytes(total_samples);

            if !self.auto_fit {
                return Err(StegError::CapacityExceeded {
                    needed: image.byte_len() as u64,
                    available,
                });
            }

            let (fitted, result) = fit_image(&image, available, self.filter)?;
            image = fitted;
            fit = Some(result);
            total_bits = embedded_bits(image.byte_len());
        }

        write_payload(samples, &image)?;

        Ok(EmbedReport {
            image_size: image.dimensions(),
            data_bytes: image.byte_len(),
            total_bits,
            total_samples,
            capacity_usage: total_bits as f64 / total_samples as f64 * 100.0,
            fit,
        })
    }

    /// Reads a hidden image back out of `samples`.
    ///
    /// # Errors
    /// - [`StegError::TruncatedStream`] if the stream is shorter than the header
    ///   or than the payload it declares
    /// - [`StegError::CorruptHeader`] if a dimension or the size is zero, or a
    ///   dimension exceeds `max_dimension`
    pub fn extract<S: Sample>(&self, samples: &[S]) -> Result<Extracted> {
        if samples.len() < HEADER_BITS {
            return Err(StegError::TruncatedStream {
                needed: HEADER_BITS as u64,
                available: samples.len(),
            });
        }

        let mut raw = [0u8; HEADER_LEN];
        for (byte, chunk) in raw.iter_mut().zip(samples[..HEADER_BITS].chunks(8)) {
            *byte = read_byte(chunk);
        }
        let header = Header::from(raw);

        debug!(
            "decoded header: {}x{}, {} bytes",
            header.width, header.height, header.data_size
        );

        if header.width == 0
            || header.height == 0
            || header.data_size == 0
            || header.width > self.max_dimension
            || header.height > self.max_dimension
        {
            return Err(StegError::CorruptHeader {
                width: header.width,
                height: header.height,
                data_size: header.data_size,
            });
        }

        let expected = header.expected_size();
        let size_mismatch = (expected != header.data_size as u64).then(|| {
            warn!(
                "Image size mismatch. Expected {}, got {}",
                expected, header.data_size
            );
            SizeMismatch {
                declared: header.data_size,
                expected,
            }
        });

        let needed = HEADER_BITS as u64 + header.data_size as u64 * 8;
        if needed > samples.len() as u64 {
            return Err(StegError::TruncatedStream {
                needed,
                available: samples.len(),
            });
        }

        let data = samples[HEADER_BITS..needed as usize]
            .chunks(8)
            .map(read_byte)
            .collect();

        Ok(Extracted {
            header,
            data,
            size_mismatch,
        })
    }

    /// [`embed`](Self::embed) over whichever sample width `buffer` holds.
    pub fn embed_buffer(&self, buffer: &mut SampleBuffer, image: ImagePayload) -> Result<EmbedReport> {
        match buffer {
            SampleBuffer::U8(samples) => self.embed(samples, image),
            SampleBuffer::I16(samples) => self.embed(samples, image),
            SampleBuffer::I32(samples) => self.embed(samples, image),
        }
    }

    /// [`extract`](Self::extract) over whichever sample width `buffer` holds.
    pub fn extract_buffer(&self, buffer: &SampleBuffer) -> Result<Extracted> {
        match buffer {
            SampleBuffer::U8(samples) => self.extract(samples),
            SampleBuffer::I16(samples) => self.extract(samples),
            SampleBuffer::I32(samples) => self.extract(samples),
        }
    }
}

/// Embeds with default settings.
pub fn embed<S: Sample>(samples: &mut [S], image: ImagePayload, auto_fit: bool) -> Result<EmbedReport> {
    LsbCodec::new().with_auto_fit(auto_fit).embed(samples, image)
}

/// Extracts with default settings.
pub fn extract<S: Sample>(samples: &[S]) -> Result<Extracted> {
    LsbCodec::new().extract(samples)
}

fn embedded_bits(data_bytes: usize) -> u64 {
    (HEADER_LEN + data_bytes) as u64 * 8
}

fn write_payload<S: Sample>(samples: &mut [S], image: &ImagePayload) -> Result<()> {
    let data_bytes = image.byte_len();
    let overflow = || StegError::CapacityExceeded {
        needed: data_bytes as u64,
        available: capacity_bytes(samples.len()),
    };

    if embedded_bits(data_bytes) > samples.len() as u64 {
        return Err(overflow());
    }
    let data_size = u32::try_from(data_bytes).map_err(|_| overflow())?;

    let (width, height) = image.dimensions();
    let header: [u8; HEADER_LEN] = Header::new(width, height, data_size).into();

    for (&byte, chunk) in header.iter().chain(image.data()).zip(samples.chunks_mut(8)) {
        for (bit_position, sample) in chunk.iter_mut().enumerate() {
            *sample = sample.with_lsb((byte >> bit_position) & 1);
        }
    }

    Ok(())
}

fn read_byte<S: Sample>(chunk: &[S]) -> u8 {
    chunk
        .iter()
        .enumerate()
        .fold(0u8, |byte, (bit_position, sample)| byte | (sample.lsb() << bit_position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn gradient(width: u32, height: u32) -> ImagePayload {
        let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        ImagePayload::new(width, height, data).unwrap()
    }

    fn noise<T>(len: usize, seed: u64) -> Vec<T>
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen()).collect()
    }

    /// Writes a raw header over the first 96 samples.
    fn stamp_header(samples: &mut [i16], header: Header) {
        let raw: [u8; HEADER_LEN] = header.into();
        for (&byte, chunk) in raw.iter().zip(samples.chunks_mut(8)) {
            for (bit, sample) in chunk.iter_mut().enumerate() {
                *sample = sample.with_lsb((byte >> bit) & 1);
            }
        }
    }

    #[test]
    fn test_round_trip_i16() {
        let image = gradient(20, 10);
        let mut samples: Vec<i16> = noise(10_000, 1);

        let report = embed(&mut samples, image.clone(), false).unwrap();
        assert_eq!(report.image_size, (20, 10));
        assert!(report.fit.is_none());

        let extracted = extract(&samples).unwrap();
        assert!(extracted.size_mismatch.is_none());
        assert_eq!(extracted.into_image().unwrap(), image);
    }

    #[test]
    fn test_round_trip_u8_and_i32() {
        let image = gradient(7, 3);

        let mut bytes: Vec<u8> = noise(2_000, 2);
        embed(&mut bytes, image.clone(), false).unwrap();
        assert_eq!(extract(&bytes).unwrap().into_image().unwrap(), image);

        let mut wide: Vec<i32> = noise(2_000, 3);
        embed(&mut wide, image.clone(), false).unwrap();
        assert_eq!(extract(&wide).unwrap().into_image().unwrap(), image);
    }

    #[test]
    fn test_random_round_trips() {
        let mut rng = StdRng::seed_from_u64(99);

        for seed in 0..25 {
            let width = rng.gen_range(1..30);
            let height = rng.gen_range(1..30);
            let data: Vec<u8> = noise((width * height * 3) as usize, seed);
            let image = ImagePayload::new(width, height, data).unwrap();

            let needed = embedded_bits(image.byte_len()) as usize;
            let mut samples: Vec<i16> = noise(needed + rng.gen_range(0..500), seed + 100);

            embed(&mut samples, image.clone(), false).unwrap();
            assert_eq!(extract(&samples).unwrap().into_image().unwrap(), image);
        }
    }

    #[test]
    fn test_exact_fit_uses_full_capacity() {
        let image = gradient(100, 100);
        let mut samples = vec![0i16; 240_096];

        let report = embed(&mut samples, image, false).unwrap();

        assert_eq!(report.total_bits, 240_096);
        assert_eq!(report.capacity_usage, 100.0);
    }

    #[test]
    fn test_one_sample_short_is_rejected() {
        let image = gradient(100, 100);
        let mut samples = vec![0i16; 240_095];

        let err = embed(&mut samples, image, false).unwrap_err();
        assert!(matches!(
            err,
            StegError::CapacityExceeded {
                needed: 30_000,
                available: 29_999,
            }
        ));
    }

    #[test]
    fn test_bit_layout_is_lsb_first() {
        let image = ImagePayload::new(1, 1, vec![0b1000_0001, 0xFF, 0x00]).unwrap();
        let mut samples = vec![0x7F00i16; 96 + 24 + 4];

        embed(&mut samples, image, false).unwrap();

        // width = 1: only the first header bit is set
        assert_eq!(samples[0], 0x7F01);
        assert!(samples[1..32].iter().all(|&s| s == 0x7F00));
        // data_size = 3 = 0b11 starts at sample 64
        assert_eq!(samples[64], 0x7F01);
        assert_eq!(samples[65], 0x7F01);
        assert_eq!(samples[66], 0x7F00);
        // first payload byte 0b1000_0001
        let first: Vec<u8> = samples[96..104].iter().map(|s| s.lsb()).collect();
        assert_eq!(first, vec![1, 0, 0, 0, 0, 0, 0, 1]);
        // trailing samples untouched
        assert!(samples[120..].iter().all(|&s| s == 0x7F00));
    }

    #[test]
    fn test_embed_is_deterministic() {
        let image = gradient(12, 12);
        let original: Vec<i16> = noise(5_000, 4);

        let mut a = original.clone();
        let mut b = original.clone();
        embed(&mut a, image.clone(), false).unwrap();
        embed(&mut b, image, false).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_auto_fit_shrinks_oversized_image() {
        let image = gradient(100, 100);
        let mut samples: Vec<i16> = noise(100_000, 5);

        let report = embed(&mut samples, image, true).unwrap();
        let fit = report.fit.clone().unwrap();

        // capacity = 100_000 / 8 - 12 = 12_488 bytes -> 64x64
        assert!(fit.resized);
        assert_eq!(fit.final_dims, (64, 64));
        assert_eq!(report.image_size, (64, 64));
        assert!(report.total_bits <= 100_000);

        let recovered = extract(&samples).unwrap().into_image().unwrap();
        assert_eq!(recovered.dimensions(), (64, 64));
    }

    #[test]
    fn test_auto_fit_cannot_rescue_tiny_stream() {
        let mut samples = vec![0i16; 100];

        let err = embed(&mut samples, gradient(4, 4), true).unwrap_err();
        assert!(matches!(err, StegError::CapacityExceeded { available: 0, .. }));
    }

    #[test]
    fn test_empty_buffer_cannot_embed() {
        let mut samples: Vec<i16> = Vec::new();
        assert!(matches!(
            embed(&mut samples, gradient(1, 1), false),
            Err(StegError::CapacityExceeded { available: -12, .. })
        ));
    }

    #[test]
    fn test_zero_width_header_is_corrupt() {
        let mut samples = vec![0i16; 1_000];
        stamp_header(&mut samples, Header::new(0, 10, 30));

        assert!(matches!(
            extract(&samples),
            Err(StegError::CorruptHeader { width: 0, .. })
        ));
    }

    #[test]
    fn test_silence_is_not_a_hidden_image() {
        let samples = vec![0i16; 1_000];
        assert!(matches!(extract(&samples), Err(StegError::CorruptHeader { .. })));
    }

    #[test]
    fn test_oversized_dimensions_are_corrupt() {
        let mut samples = vec![0i16; 1_000];
        stamp_header(&mut samples, Header::new(10_001, 1, 30_003));
        assert!(matches!(extract(&samples), Err(StegError::CorruptHeader { .. })));

        stamp_header(&mut samples, Header::new(10_000, 1, 30_000));
        assert!(matches!(extract(&samples), Err(StegError::TruncatedStream { .. })));
    }

    #[test]
    fn test_max_dimension_is_configurable() {
        let mut samples = vec![0i16; 1_000];
        stamp_header(&mut samples, Header::new(50, 1, 150));

        let strict = LsbCodec::new().with_max_dimension(32);
        assert!(matches!(strict.extract(&samples), Err(StegError::CorruptHeader { .. })));
    }

    #[test]
    fn test_truncated_stream() {
        let mut samples = vec![0i16; 96 + 8 * 10];
        stamp_header(&mut samples, Header::new(2, 2, 12));

        let err = extract(&samples).unwrap_err();
        assert!(matches!(
            err,
            StegError::TruncatedStream {
                needed: 192,
                available: 176,
            }
        ));
    }

    #[test]
    fn test_stream_shorter_than_header() {
        let samples = vec![0i16; 50];
        assert!(matches!(
            extract(&samples),
            Err(StegError::TruncatedStream { needed: 96, available: 50 })
        ));
    }

    #[test]
    fn test_size_mismatch_is_reported_not_fatal() {
        let mut samples = vec![0i16; 96 + 8 * 20];
        stamp_header(&mut samples, Header::new(2, 2, 15));

        let extracted = extract(&samples).unwrap();
        assert_eq!(
            extracted.size_mismatch,
            Some(SizeMismatch {
                declared: 15,
                expected: 12,
            })
        );
        assert_eq!(extracted.data.len(), 15);
        assert_eq!(extracted.image().unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_short_declared_size_cannot_materialize() {
        let mut samples = vec![0i16; 96 + 8 * 20];
        stamp_header(&mut samples, Header::new(2, 2, 9));

        let extracted = extract(&samples).unwrap();
        assert!(extracted.size_mismatch.is_some());
        assert!(matches!(
            extracted.into_image(),
            Err(StegError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_buffer_dispatch() {
        let image = gradient(5, 5);
        let mut buffer = SampleBuffer::U8(vec![128; 1_000]);

        LsbCodec::new().embed_buffer(&mut buffer, image.clone()).unwrap();
        let extracted = LsbCodec::new().extract_buffer(&buffer).unwrap();

        assert_eq!(extracted.into_image().unwrap(), image);
    }
}
