//! Per-cell arithmetic and compositing operators.
//!
//! Field operands whose dimensions differ from the receiver are
//! resampled on the fly through the normalized bilinear accessor. This
//! is the path that lets differently-sized stamps composite onto a
//! target grid, so a mismatch is never an error.
use serde::{Deserialize, Serialize};

use super::HeightField;

/// Compositing policy for [`HeightField::copy_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyMode {
    /// Overwrite every cell.
    Always,
    /// Overwrite only where the source value is below the current one.
    IfLessThan,
    /// Overwrite only where the source value is above the current one.
    IfGreaterThan,
}

impl HeightField {
    fn zip_scalar(&mut self, f: impl Fn(f32) -> f32) -> &mut Self {
        for v in &mut self.values {
            *v = f(*v);
        }
        self.touch();
        self
    }

    fn zip_field(&mut self, other: &HeightField, f: impl Fn(f32, f32) -> f32) -> &mut Self {
        let resampled;
        let src: &[f32] = if other.width == self.width && other.depth == self.depth {
            &other.values
        } else {
            resampled = other.resampled(self.width, self.depth);
            &resampled.values
        };
        for (v, &o) in self.values.iter_mut().zip(src) {
            *v = f(*v, o);
        }
        self.touch();
        self
    }

    pub fn add(&mut self, scalar: f32) -> &mut Self {
        self.zip_scalar(|v| v + scalar)
    }

    pub fn add_clamped(&mut self, scalar: f32, min: f32, max: f32) -> &mut Self {
        self.zip_scalar(|v| (v + scalar).clamp(min, max))
    }

    pub fn add_field(&mut self, other: &HeightField) -> &mut Self {
        self.zip_field(other, |v, o| v + o)
    }

    pub fn add_field_clamped(&mut self, other: &HeightField, min: f32, max: f32) -> &mut Self {
        self.zip_field(other, |v, o| (v + o).clamp(min, max))
    }

    pub fn subtract(&mut self, scalar: f32) -> &mut Self {
        self.zip_scalar(|v| v - scalar)
    }

    pub fn subtract_clamped(&mut self, scalar: f32, min: f32, max: f32) -> &mut Self {
        self.zip_scalar(|v| (v - scalar).clamp(min, max))
    }

    pub fn subtract_field(&mut self, other: &HeightField) -> &mut Self {
        self.zip_field(other, |v, o| v - o)
    }

    pub fn subtract_field_clamped(&mut self, other: &HeightField, min: f32, max: f32) -> &mut Self {
        self.zip_field(other, |v, o| (v - o).clamp(min, max))
    }

    pub fn multiply(&mut self, scalar: f32) -> &mut Self {
        self.zip_scalar(|v| v * scalar)
    }

    pub fn multiply_clamped(&mut self, scalar: f32, min: f32, max: f32) -> &mut Self {
        self.zip_scalar(|v| (v * scalar).clamp(min, max))
    }

    pub fn multiply_field(&mut self, other: &HeightField) -> &mut Self {
        self.zip_field(other, |v, o| v * o)
    }

    pub fn multiply_field_clamped(&mut self, other: &HeightField, min: f32, max: f32) -> &mut Self {
        self.zip_field(other, |v, o| (v * o).clamp(min, max))
    }

    /// Scalar division. A ~0 divisor is substituted with 1, leaving the
    /// grid unchanged rather than producing infinities.
    pub fn divide(&mut self, scalar: f32) -> &mut Self {
        if scalar.abs() < f32::EPSILON {
            return self;
        }
        self.zip_scalar(|v| v / scalar)
    }

    pub fn divide_clamped(&mut self, scalar: f32, min: f32, max: f32) -> &mut Self {
        if scalar.abs() < f32::EPSILON {
            return self;
        }
        self.zip_scalar(|v| (v / scalar).clamp(min, max))
    }

    /// Element-wise division; cells where the divisor is ~0 keep their
    /// current value.
    pub fn divide_field(&mut self, other: &HeightField) -> &mut Self {
        self.zip_field(other, |v, o| if o.abs() < f32::EPSILON { v } else { v / o })
    }

    pub fn divide_field_clamped(&mut self, other: &HeightField, min: f32, max: f32) -> &mut Self {
        self.zip_field(other, |v, o| {
            if o.abs() < f32::EPSILON {
                v
            } else {
                (v / o).clamp(min, max)
            }
        })
    }

    /// Per-cell interpolation toward `target` by the fraction stored in
    /// `mask` (1 = fully replace, 0 = keep). Both operands are resampled
    /// independently when their dimensions differ.
    pub fn lerp(&mut self, target: &HeightField, mask: &HeightField) -> &mut Self {
        let rt;
        let target_vals: &[f32] = if target.width == self.width && target.depth == self.depth {
            &target.values
        } else {
            rt = target.resampled(self.width, self.depth);
            &rt.values
        };
        let rm;
        let mask_vals: &[f32] = if mask.width == self.width && mask.depth == self.depth {
            &mask.values
        } else {
            rm = mask.resampled(self.width, self.depth);
            &rm.values
        };
        for (i, v) in self.values.iter_mut().enumerate() {
            *v += (target_vals[i] - *v) * mask_vals[i];
        }
        self.touch();
        self
    }

    /// Composite `source` onto this grid under the given policy.
    /// `IfGreaterThan` realizes "only raise", `IfLessThan` "only lower".
    pub fn copy_from(&mut self, source: &HeightField, mode: CopyMode) -> &mut Self {
        self.zip_field(source, move |v, o| match mode {
            CopyMode::Always => o,
            CopyMode::IfLessThan => {
                if o < v {
                    o
                } else {
                    v
                }
            }
            CopyMode::IfGreaterThan => {
                if o > v {
                    o
                } else {
                    v
                }
            }
        })
    }

    /// Unconditional copy with each incoming value clamped into
    /// `[min, max]`.
    pub fn copy_clamped(&mut self, source: &HeightField, min: f32, max: f32) -> &mut Self {
        self.zip_field(source, |_, o| o.clamp(min, max))
    }

    /// `v = 1 - v` per cell.
    pub fn invert(&mut self) -> &mut Self {
        self.zip_scalar(|v| 1.0 - v)
    }

    /// Transpose the grid, swapping the two axes. Cached statistics are
    /// reset (a transpose invalidates nothing numerically, but the cache
    /// contract is per-layout).
    pub fn flip(&mut self) -> &mut Self {
        let mut out = vec![0.0f32; self.values.len()];
        for z in 0..self.depth {
            for x in 0..self.width {
                out[x * self.depth + z] = self.values[z * self.width + x];
            }
        }
        self.values = out;
        std::mem::swap(&mut self.width, &mut self.depth);
        self.min_value = 0.0;
        self.max_value = 0.0;
        self.sum_value = 0.0;
        self.touch();
        self
    }

    /// Linearly rescale so the grid's minimum maps to 0 and its maximum
    /// to 1. A ~0 range is a no-op.
    pub fn normalise(&mut self) -> &mut Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
        }
        let range = max - min;
        if !range.is_finite() || range < f32::EPSILON {
            return self;
        }
        self.zip_scalar(|v| (v - min) / range)
    }

    /// Per-cell `v^exponent`.
    pub fn power(&mut self, exponent: f32) -> &mut Self {
        self.zip_scalar(|v| v.powf(exponent))
    }

    /// Per-cell contrast about the 0.5 midpoint:
    /// `clamp01((v - 0.5) * amount + 0.5)`.
    pub fn contrast(&mut self, amount: f32) -> &mut Self {
        self.zip_scalar(|v| ((v - 0.5) * amount + 0.5).clamp(0.0, 1.0))
    }
}
