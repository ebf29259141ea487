//! Error taxonomy for the core.
//!
//! Data-shape mistakes (mismatched dimensions, empty terrace tables,
//! inverted talus bands) are reported as values and the receiver is left
//! unmutated. Numerical edge cases inside the operators never surface
//! here; they are absorbed with neutral fallbacks at the call site.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    /// A source array's length does not match the stated grid dimensions.
    #[error("value buffer holds {got} samples, grid is {width}x{depth}")]
    DimensionMismatch {
        width: usize,
        depth: usize,
        got: usize,
    },

    /// Terraced quantization called with no terrace bands.
    #[error("terraced quantization requires at least one start height")]
    EmptyTerraceSpec,

    /// Terrace start heights and response curves differ in length.
    #[error("terrace spec mismatch: {starts} start heights, {curves} curves")]
    TerraceSpecLengthMismatch { starts: usize, curves: usize },

    /// Thermal erosion called with `talus_min > talus_max`.
    #[error("invalid talus band: min {min} exceeds max {max}")]
    InvalidTalusBand { min: f32, max: f32 },

    /// A RAW file's size is inconsistent with 16-bit samples. The caller
    /// may retry with `RawBitDepth::Eight` to force a byte-per-sample
    /// reinterpretation.
    #[error("{bytes}-byte RAW file is not a square 16-bit grid; retry as 8-bit")]
    AmbiguousRawFormat { bytes: usize },

    /// A RAW file's sample count is not a perfect square.
    #[error("RAW file holds {samples} samples, which is not a square grid")]
    NonSquareRaw { samples: usize },

    /// A serialized blob is truncated or structurally invalid.
    #[error("corrupt heightfield blob: {0}")]
    Corrupt(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
