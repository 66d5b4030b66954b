//! Sample types the codec can write into.
//!
//! LSB manipulation works on the native bit pattern of each sample type, so the
//! sign bit and the other high-order bits are never disturbed.

use serde::Serialize;

/// Stream format of a sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSpec {
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes per sample: 1, 2 or 4.
    pub sample_width: u16,
}

/// An integer audio sample whose lowest bit can carry one payload bit.
pub trait Sample: Copy {
    /// Current least-significant bit, `0` or `1`.
    fn lsb(self) -> u8;

    /// Same sample with bit 0 replaced by the low bit of `bit`.
    fn with_lsb(self, bit: u8) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn lsb(self) -> u8 {
                    (self & 1) as u8
                }

                #[inline]
                fn with_lsb(self, bit: u8) -> Self {
                    (self & !1) | (bit & 1) as $t
                }
            }
        )*
    };
}

impl_sample!(u8, i16, i32);

/// A flat run of samples of one width, channels interleaved.
///
/// 8-bit WAV data is unsigned; 16- and 32-bit data is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleBuffer {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::U8(s) => s.len(),
            SampleBuffer::I16(s) => s.len(),
            SampleBuffer::I32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of one sample in bytes.
    pub fn sample_width(&self) -> u16 {
        match self {
            SampleBuffer::U8(_) => 1,
            SampleBuffer::I16(_) => 2,
            SampleBuffer::I32(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_samples_keep_sign() {
        assert_eq!((-32768i16).with_lsb(1), -32767);
        assert_eq!((-1i16).with_lsb(0), -2);
        assert_eq!((-1i16).lsb(), 1);
        assert_eq!(i32::MIN.with_lsb(1), i32::MIN + 1);
        assert_eq!(i32::MAX.with_lsb(0), i32::MAX - 1);
    }

    #[test]
    fn test_only_bit_zero_changes() {
        for value in [0u8, 1, 127, 128, 254, 255] {
            assert_eq!(value.with_lsb(0), value & 0xFE);
            assert_eq!(value.with_lsb(1), value | 1);
            assert_eq!(value.with_lsb(1).lsb(), 1);
        }
    }

    #[test]
    fn test_with_lsb_ignores_high_bits_of_input() {
        assert_eq!(4i16.with_lsb(0b11), 5);
        assert_eq!(5i16.with_lsb(0b10), 4);
    }

    #[test]
    fn test_buffer_widths() {
        assert_eq!(SampleBuffer::U8(vec![0; 3]).sample_width(), 1);
        assert_eq!(SampleBuffer::I16(vec![0; 3]).sample_width(), 2);
        assert_eq!(SampleBuffer::I32(vec![]).sample_width(), 4);
        assert!(SampleBuffer::I32(vec![]).is_empty());
    }
}
