//! Fixed-layout header written in front of every hidden image.
//!
//! Three little-endian `u32` fields in the order `width`, `height`, `data_size`.
//! No padding, no version, no checksum.

/// Serialized header length in bytes.
pub const HEADER_LEN: usize = 12;

/// Number of samples the header occupies (one bit per sample).
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// Image metadata stored in the first [`HEADER_BITS`] sample LSBs.
///
/// Parsing performs no validation; range checks belong to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub data_size: u32,
}

impl Header {
    pub fn new(width: u32, height: u32, data_size: u32) -> Self {
        Self {
            width,
            height,
            data_size,
        }
    }

    /// Byte count a well-formed header would declare for its dimensions.
    pub fn expected_size(&self) -> u64 {
        (self.width as u64 * self.height as u64).saturating_mul(3)
    }
}

impl From<[u8; HEADER_LEN]> for Header {
    fn from(raw: [u8; HEADER_LEN]) -> Self {
        let field = |i: usize| u32::from_le_bytes([raw[i], raw[i + 1], raw[i + 2], raw[i + 3]]);

        Self {
            width: field(0),
            height: field(4),
            data_size: field(8),
        }
    }
}

impl From<Header> for [u8; HEADER_LEN] {
    fn from(header: Header) -> Self {
        let mut raw = [0u8; HEADER_LEN];
        raw[0..4].copy_from_slice(&header.width.to_le_bytes());
        raw[4..8].copy_from_slice(&header.height.to_le_bytes());
        raw[8..12].copy_from_slice(&header.data_size.to_le_bytes());
        raw
    }
}
