//! RIFF/WAVE PCM reading and writing.
//!
//! Only uncompressed integer PCM is accepted (format tag 1, or
//! WAVE_FORMAT_EXTENSIBLE with a PCM sub-format). Unknown chunks are skipped
//! on read and dropped on write.

use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, StegError};
use crate::processing::capacity::CapacityReport;
use crate::processing::samples::{AudioSpec, SampleBuffer};
use crate::utils::output::write_atomic;

const FORMAT_PCM: u16 = 1;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the canonical header written by [`WavFile::to_bytes`].
pub const CANONICAL_HEADER_LEN: usize = 44;

/// A decoded WAV file: format plus interleaved samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavFile {
    pub spec: AudioSpec,
    pub samples: SampleBuffer,
}

impl WavFile {
    /// Wraps samples, checking that their width matches `spec`.
    pub fn new(spec: AudioSpec, samples: SampleBuffer) -> Result<Self> {
        if spec.channels == 0 {
            return Err(StegError::InvalidWav("channel count is zero".to_string()));
        }
        if spec.sample_rate == 0 {
            return Err(StegError::InvalidWav("sample rate is zero".to_string()));
        }
        if spec.sample_width != samples.sample_width() {
            return Err(StegError::UnsupportedFormat {
                sample_width: spec.sample_width,
            });
        }

        Ok(Self { spec, samples })
    }

    /// Reads and decodes a WAV file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a complete WAV file held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(StegError::InvalidWav("missing RIFF/WAVE header".to_string()));
        }

        let mut spec = None;
        let mut pos = 12;

        while pos + 8 <= bytes.len() {
            let chunk_id = &bytes[pos..pos + 4];
            let chunk_size = read_u32(bytes, pos + 4) as usize;
            let body_start = pos + 8;
            let body_end = body_start.saturating_add(chunk_size).min(bytes.len());
            let body = &bytes[body_start..body_end];

            match chunk_id {
                b"fmt " => spec = Some(parse_fmt(body)?),
                b"data" => {
                    let spec = spec.ok_or_else(|| {
                        StegError::InvalidWav("data chunk before fmt chunk".to_string())
                    })?;
                    return Ok(Self {
                        samples: decode_samples(&spec, body)?,
                        spec,
                    });
                }
                other => debug!("skipping chunk {:?}", String::from_utf8_lossy(other)),
            }

            pos = body_start.saturating_add(chunk_size);
            // Align to word boundary
            if chunk_size % 2 == 1 {
                pos = pos.saturating_add(1);
            }
        }

        Err(StegError::InvalidWav("no data chunk found".to_string()))
    }

    /// Encodes as a canonical 44-byte-header PCM WAV file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let data = encode_samples(&self.samples);
        let data_len = data.len() as u32;
        let pad = data.len() % 2;
        let riff_len = 36 + data_len + pad as u32;

        let block_align = self.spec.channels * self.spec.sample_width;
        let byte_rate = self.spec.sample_rate * block_align as u32;

        let mut wav = Vec::with_capacity(CANONICAL_HEADER_LEN + data.len() + pad);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&riff_len.to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&FORMAT_PCM.to_le_bytes());
        wav.extend_from_slice(&self.spec.channels.to_le_bytes());
        wav.extend_from_slice(&self.spec.sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&(self.spec.sample_width * 8).to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.extend_from_slice(&data);
        if pad == 1 {
            wav.push(0);
        }
        wav
    }

    /// Writes the file atomically; a failed save leaves no file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes();
        write_atomic(path, |w| Ok(w.write_all(&bytes)?))
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    pub fn capacity(&self) -> CapacityReport {
        CapacityReport::new(&self.spec, self.samples.len())
    }
}

fn read_u16(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([bytes[pos], bytes[pos + 1]])
}

fn read_u32(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

fn parse_fmt(body: &[u8]) -> Result<AudioSpec> {
    if body.len() < 16 {
        return Err(StegError::InvalidWav(format!(
            "fmt chunk too short: {} bytes",
            body.len()
        )));
    }

    let mut format_tag = read_u16(body, 0);
    let channels = read_u16(body, 2);
    let sample_rate = read_u32(body, 4);
    let bits_per_sample = read_u16(body, 14);

    if format_tag == FORMAT_EXTENSIBLE && body.len() >= 26 {
        // sub-format GUID starts with the real format tag
        format_tag = read_u16(body, 24);
    }

    if format_tag != FORMAT_PCM {
        return Err(StegError::InvalidWav(format!(
            "unsupported format tag {:#06x}, only integer PCM is supported",
            format_tag
        )));
    }
    if channels == 0 {
        return Err(StegError::InvalidWav("channel count is zero".to_string()));
    }
    if sample_rate == 0 {
        return Err(StegError::InvalidWav("sample rate is zero".to_string()));
    }

    let sample_width = bits_per_sample.div_ceil(8);
    if !matches!(sample_width, 1 | 2 | 4) {
        return Err(StegError::UnsupportedFormat { sample_width });
    }

    Ok(AudioSpec {
        channels,
        sample_rate,
        sample_width,
    })
}

fn decode_samples(spec: &AudioSpec, data: &[u8]) -> Result<SampleBuffer> {
    let frame_len = spec.channels as usize * spec.sample_width as usize;
    // a trailing partial frame is dropped
    let data = &data[..data.len() / frame_len * frame_len];

    let samples = match spec.sample_width {
        1 => SampleBuffer::U8(data.to_vec()),
        2 => SampleBuffer::I16(
            data.chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect(),
        ),
        4 => SampleBuffer::I32(
            data.chunks_exact(4)
                .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        ),
        sample_width => return Err(StegError::UnsupportedFormat { sample_width }),
    };

    Ok(samples)
}

fn encode_samples(samples: &SampleBuffer) -> Vec<u8> {
    match samples {
        SampleBuffer::U8(s) => s.clone(),
        SampleBuffer::I16(s) => s.iter().flat_map(|v| v.to_le_bytes()).collect(),
        SampleBuffer::I32(s) => s.iter().flat_map(|v| v.to_le_bytes()).collect(),
    }
}
