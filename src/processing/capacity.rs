//! Capacity arithmetic: how many payload bytes a sample count can carry.
//!
//! Each sample holds one payload bit, so eight samples carry one byte. The
//! header's [`HEADER_LEN`] bytes are subtracted from that budget.

use serde::Serialize;

use crate::processing::header::HEADER_LEN;
use crate::processing::samples::AudioSpec;

/// Payload bytes embeddable in `total_samples` after header overhead.
///
/// Negative when `total_samples < 96`. Callers decide what that means: it is
/// fatal for embedding and reported as-is for inspection.
pub fn capacity_bytes(total_samples: usize) -> i64 {
    (total_samples / 8) as i64 - HEADER_LEN as i64
}

/// Snapshot of a sample stream's metadata and the payload it can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityReport {
    pub total_samples: usize,
    pub capacity_bytes: i64,
    pub capacity_kb: f64,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
}

impl CapacityReport {
    pub fn new(spec: &AudioSpec, total_samples: usize) -> Self {
        let capacity_bytes = capacity_bytes(total_samples);
        let frames = total_samples / spec.channels.max(1) as usize;

        let duration_seconds = if spec.sample_rate > 0 {
            frames as f64 / spec.sample_rate as f64
        } else {
            0.0
        };

        Self {
            total_samples,
            capacity_bytes,
            capacity_kb: capacity_bytes as f64 / 1024.0,
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            sample_width: spec.sample_width,
        }
    }

    pub fn capacity_mb(&self) -> f64 {
        self.capacity_kb / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    #[test]
    fn test_ten_seconds_of_mono_cd_audio() {
        let spec = AudioSpec {
            channels: 1,
            sample_rate: 44_100,
            sample_width: 2,
        };
        let report = CapacityReport::new(&spec, 441_000);

        assert_eq!(report.capacity_bytes, 55_113);
        assert_eq!(report.duration_seconds, 10.0);
        assert!((report.capacity_kb - 55_113.0 / 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_streams_report_negative_capacity() {
        assert_eq!(capacity_bytes(0), -12);
        assert_eq!(capacity_bytes(95), -1);
        assert_eq!(capacity_bytes(96), 0);
        assert_eq!(capacity_bytes(104), 1);
    }

    #[test]
    fn test_capacity_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: Vec<usize> = (0..500).map(|_| rng.gen_range(0..2_000_000)).collect();
        counts.sort_unstable();

        for pair in counts.windows(2) {
            assert!(capacity_bytes(pair[0]) <= capacity_bytes(pair[1]));
        }
        for n in counts {
            assert_eq!(capacity_bytes(n), (n / 8) as i64 - 12);
        }
    }

    #[test]
    fn test_stereo_duration_counts_frames() {
        let spec = AudioSpec {
            channels: 2,
            sample_rate: 8_000,
            sample_width: 1,
        };
        let report = CapacityReport::new(&spec, 16_000);

        assert_eq!(report.duration_seconds, 1.0);
        assert_eq!(report.capacity_bytes, 1_988);
    }
}
