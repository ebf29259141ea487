//! Native binary blob format.
//!
//! Layout, little-endian throughout:
//!
//! ```text
//! width:        i32
//! depth:        i32
//! metadata_len: i32
//! metadata:     metadata_len bytes
//! values:       width * depth f32, row-major (z rows)
//! ```
//!
//! Round-trips are bit-exact. Loading parses into a fresh value and
//! returns an error otherwise, so no partially-initialized field is
//! ever observable.
use std::fs;
use std::path::Path;

use crate::error::FieldError;
use crate::field::HeightField;

impl HeightField {
    /// Serialize to the binary blob layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.metadata.len() + self.values.len() * 4);
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&(self.depth as i32).to_le_bytes());
        out.extend_from_slice(&(self.metadata.len() as i32).to_le_bytes());
        out.extend_from_slice(&self.metadata);
        for v in &self.values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    /// Deserialize a binary blob produced by [`HeightField::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        let mut cursor = 0usize;
        let width = read_i32(bytes, &mut cursor)?;
        let depth = read_i32(bytes, &mut cursor)?;
        let metadata_len = read_i32(bytes, &mut cursor)?;
        if width < 0 || depth < 0 || metadata_len < 0 {
            return Err(FieldError::Corrupt("negative header field"));
        }
        let (width, depth, metadata_len) = (width as usize, depth as usize, metadata_len as usize);

        if bytes.len() < cursor + metadata_len {
            return Err(FieldError::Corrupt("metadata truncated"));
        }
        let metadata = bytes[cursor..cursor + metadata_len].to_vec();
        cursor += metadata_len;

        let cell_count = width * depth;
        if bytes.len() != cursor + cell_count * 4 {
            return Err(FieldError::Corrupt("value block size mismatch"));
        }
        let mut values = Vec::with_capacity(cell_count);
        for chunk in bytes[cursor..].chunks_exact(4) {
            values.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }

        let mut field = HeightField::from_values(width, depth, values)?;
        field.metadata = metadata;
        Ok(field)
    }

    pub fn save_binary(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn load_binary(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

fn read_i32(bytes: &[u8], cursor: &mut usize) -> Result<i32, FieldError> {
    let end = *cursor + 4;
    if bytes.len() < end {
        return Err(FieldError::Corrupt("header truncated"));
    }
    let v = i32::from_le_bytes(bytes[*cursor..end].try_into().expect("4-byte slice"));
    *cursor = end;
    Ok(v)
}
