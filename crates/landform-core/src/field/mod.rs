//! Dense 2D scalar grid with in-place image-style operators.
//!
//! Values are f32 in a nominal [0, 1] domain, stored row-major
//! (`values[z * width + x]`). Coordinate math uses f32 for normalized
//! sampling and f64 for accumulation. Mutators return `&mut Self` so
//! pipelines can chain calls.
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

pub mod arith;
pub mod curve;
pub mod filter;

pub use curve::ResponseCurve;

/// A width × depth grid of elevation-like samples.
///
/// Cached statistics are valid only after [`HeightField::refresh_stats`];
/// mutation does not invalidate them automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightField {
    pub(crate) values: Vec<f32>,
    pub(crate) width: usize,
    pub(crate) depth: usize,
    /// Opaque caller-defined bytes carried through serialization.
    pub(crate) metadata: Vec<u8>,
    #[serde(skip)]
    pub(crate) dirty: bool,
    #[serde(skip)]
    pub(crate) min_value: f32,
    #[serde(skip)]
    pub(crate) max_value: f32,
    #[serde(skip)]
    pub(crate) sum_value: f64,
}

impl HeightField {
    /// Create a zero-filled grid.
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            values: vec![0.0; width * depth],
            width,
            depth,
            metadata: Vec::new(),
            dirty: false,
            min_value: 0.0,
            max_value: 0.0,
            sum_value: 0.0,
        }
    }

    /// Wrap an existing row-major sample buffer.
    pub fn from_values(width: usize, depth: usize, values: Vec<f32>) -> Result<Self, FieldError> {
        if values.len() != width * depth {
            return Err(FieldError::DimensionMismatch {
                width,
                depth,
                got: values.len(),
            });
        }
        let mut field = Self::new(width, depth);
        field.values = values;
        Ok(field)
    }

    /// Extract one layer of a flattened `width × depth × layers` volume,
    /// indexed `(z * width + x) * layers + layer`.
    pub fn from_volume_layer(
        volume: &[f32],
        width: usize,
        depth: usize,
        layers: usize,
        layer: usize,
    ) -> Result<Self, FieldError> {
        if layer >= layers || volume.len() != width * depth * layers {
            return Err(FieldError::DimensionMismatch {
                width,
                depth,
                got: volume.len(),
            });
        }
        let mut field = Self::new(width, depth);
        for i in 0..width * depth {
            field.values[i] = volume[i * layers + layer];
        }
        Ok(field)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Vec<u8>) -> &mut Self {
        self.metadata = metadata;
        self
    }

    /// True once any in-place operator has run since the last
    /// [`HeightField::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub(crate) fn touch(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub(crate) fn idx(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    /// Exact-index read. Out-of-range coordinates are a contract
    /// violation and panic.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.values[z * self.width + x]
    }

    /// Exact-index write. Out-of-range coordinates are a contract
    /// violation and panic.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        let i = self.idx(x, z);
        self.values[i] = value;
        self.dirty = true;
    }

    /// Edge-clamped read: both coordinates are clamped independently to
    /// the valid index range. Filters use this to sample just past an
    /// edge without wraparound.
    #[inline]
    pub fn get_clamped(&self, x: isize, z: isize) -> f32 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cz = z.clamp(0, self.depth as isize - 1) as usize;
        self.values[cz * self.width + cx]
    }

    /// Edge-clamped write.
    #[inline]
    pub fn set_clamped(&mut self, x: isize, z: isize, value: f32) {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cz = z.clamp(0, self.depth as isize - 1) as usize;
        let i = cz * self.width + cx;
        self.values[i] = value;
        self.dirty = true;
    }

    /// Bilinear sample at normalized coordinates in [0, 1].
    ///
    /// The input is scaled onto the `(width - 1) × (depth - 1)` cell
    /// lattice; the far neighbour index is clamped to the last valid
    /// row/column, so `sample(1.0, 1.0)` reads exactly
    /// `get(width - 1, depth - 1)`.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let fx = x.clamp(0.0, 1.0) * (self.width - 1) as f32;
        let fz = z.clamp(0.0, 1.0) * (self.depth - 1) as f32;

        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let v00 = self.values[z0 * self.width + x0];
        let v10 = self.values[z0 * self.width + x1];
        let v01 = self.values[z1 * self.width + x0];
        let v11 = self.values[z1 * self.width + x1];

        v00 * (1.0 - tx) * (1.0 - tz)
            + v10 * tx * (1.0 - tz)
            + v01 * (1.0 - tx) * tz
            + v11 * tx * tz
    }

    /// Write at normalized coordinates: the input maps to the
    /// nearest-floor cell (same far-edge clamp as [`HeightField::sample`]);
    /// no interpolation is performed on write.
    pub fn set_normalized(&mut self, x: f32, z: f32, value: f32) {
        if self.values.is_empty() {
            return;
        }
        let cx = (x.clamp(0.0, 1.0) * (self.width - 1) as f32).floor() as usize;
        let cz = (z.clamp(0.0, 1.0) * (self.depth - 1) as f32).floor() as usize;
        let i = cz.min(self.depth - 1) * self.width + cx.min(self.width - 1);
        self.values[i] = value;
        self.dirty = true;
    }

    /// Broadcast `value` (clamped to [0, 1]) to every cell.
    pub fn fill(&mut self, value: f32) -> &mut Self {
        let v = value.clamp(0.0, 1.0);
        self.values.fill(v);
        self.touch();
        self
    }

    /// Recompute the cached min/max/sum by full scan. Must be called
    /// before reading [`HeightField::min_value`] and friends; mutation
    /// does not refresh the cache.
    pub fn refresh_stats(&mut self) -> &mut Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        if self.values.is_empty() {
            min = 0.0;
            max = 0.0;
        }
        self.min_value = min;
        self.max_value = max;
        self.sum_value = sum;
        self
    }

    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn sum_value(&self) -> f64 {
        self.sum_value
    }

    /// Produce a `width × depth` copy resampled through the normalized
    /// bilinear accessor. Metadata is carried over.
    pub fn resampled(&self, width: usize, depth: usize) -> HeightField {
        let mut out = HeightField::new(width, depth);
        out.metadata = self.metadata.clone();
        if out.values.is_empty() || self.values.is_empty() {
            return out;
        }
        let sx = if width > 1 { 1.0 / (width - 1) as f32 } else { 0.0 };
        let sz = if depth > 1 { 1.0 / (depth - 1) as f32 } else { 0.0 };
        for z in 0..depth {
            for x in 0..width {
                out.values[z * width + x] = self.sample(x as f32 * sx, z as f32 * sz);
            }
        }
        out
    }
}
