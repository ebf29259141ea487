//! Heightfield serialization: the native binary blob format and the
//! flat RAW import path.
pub mod binary;
pub mod raw;

pub use raw::{RawBitDepth, RawByteOrder};
