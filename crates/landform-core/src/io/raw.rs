//! Flat RAW heightmap import.
//!
//! A RAW file is a square, row-major grid of unsigned 8- or 16-bit
//! samples with no header; the resolution is inferred from the file
//! size. 16-bit samples come in either byte order ("Macintosh" = big
//! endian, "IBM" = little endian) and normalize by 65535; 8-bit samples
//! normalize by 255.
//!
//! A file whose size cannot be a square 16-bit grid yields
//! [`FieldError::AmbiguousRawFormat`]; the caller decides whether to
//! retry with [`RawBitDepth::Eight`]. No prompt, no guessing.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::HeightField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawByteOrder {
    /// Big endian.
    Macintosh,
    /// Little endian.
    Ibm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawBitDepth {
    Eight,
    Sixteen,
}

impl HeightField {
    pub fn load_raw(
        path: impl AsRef<Path>,
        byte_order: RawByteOrder,
        bit_depth: RawBitDepth,
    ) -> Result<Self, FieldError> {
        let bytes = fs::read(path)?;
        Self::from_raw_bytes(&bytes, byte_order, bit_depth)
    }

    /// Decode an in-memory RAW sample block. Resolution is
    /// `ceil(sqrt(byte_count / sample_size))` and must square back to
    /// the sample count exactly.
    pub fn from_raw_bytes(
        bytes: &[u8],
        byte_order: RawByteOrder,
        bit_depth: RawBitDepth,
    ) -> Result<Self, FieldError> {
        match bit_depth {
            RawBitDepth::Sixteen => {
                if bytes.len() % 2 != 0 {
                    return Err(FieldError::AmbiguousRawFormat { bytes: bytes.len() });
                }
                let samples = bytes.len() / 2;
                let resolution = inferred_resolution(samples);
                if resolution * resolution != samples {
                    return Err(FieldError::AmbiguousRawFormat { bytes: bytes.len() });
                }
                let values = bytes
                    .chunks_exact(2)
                    .map(|pair| {
                        let raw = match byte_order {
                            RawByteOrder::Macintosh => u16::from_be_bytes([pair[0], pair[1]]),
                            RawByteOrder::Ibm => u16::from_le_bytes([pair[0], pair[1]]),
                        };
                        raw as f32 / 65535.0
                    })
                    .collect();
                HeightField::from_values(resolution, resolution, values)
            }
            RawBitDepth::Eight => {
                let samples = bytes.len();
                let resolution = inferred_resolution(samples);
                if resolution * resolution != samples {
                    return Err(FieldError::NonSquareRaw { samples });
                }
                let values = bytes.iter().map(|&b| b as f32 / 255.0).collect();
                HeightField::from_values(resolution, resolution, values)
            }
        }
    }
}

fn inferred_resolution(samples: usize) -> usize {
    (samples as f64).sqrt().ceil() as usize
}
