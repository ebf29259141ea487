//! Convolution-style whole-grid filters.
//!
//! Every filter reads from a snapshot of the grid and writes a full pass
//! before the next begins, so results do not depend on sweep order.
use super::curve::ResponseCurve;
use super::HeightField;
use crate::error::FieldError;

impl HeightField {
    /// `iterations` passes of a 4-neighbour (N/E/S/W) average filter with
    /// edge-clamped reads, each pass clamped to [0, 1].
    pub fn smooth(&mut self, iterations: u32) -> &mut Self {
        if self.values.is_empty() {
            return self;
        }
        let mut next = self.values.clone();
        for _ in 0..iterations {
            for z in 0..self.depth {
                for x in 0..self.width {
                    let xi = x as isize;
                    let zi = z as isize;
                    let sum = self.get_clamped(xi, zi - 1)
                        + self.get_clamped(xi + 1, zi)
                        + self.get_clamped(xi, zi + 1)
                        + self.get_clamped(xi - 1, zi);
                    next[z * self.width + x] = (sum / 4.0).clamp(0.0, 1.0);
                }
            }
            std::mem::swap(&mut self.values, &mut next);
        }
        self.touch();
        self
    }

    /// Box blur over a `(2 * radius + 1)`-wide window, approximated by a
    /// separable running-sum pass per axis. The radius is floored to 5;
    /// cells within `radius` of an edge are left unfiltered.
    pub fn smooth_radius(&mut self, radius: usize) -> &mut Self {
        let radius = radius.max(5);
        let window = 2 * radius + 1;
        let w = self.width;
        let d = self.depth;

        // Horizontal pass.
        if w > 2 * radius {
            let mut out = self.values.clone();
            for z in 0..d {
                let row = &self.values[z * w..(z + 1) * w];
                let mut run: f64 = row[..window].iter().map(|&v| v as f64).sum();
                out[z * w + radius] = (run / window as f64) as f32;
                for x in radius + 1..w - radius {
                    run += row[x + radius] as f64 - row[x - radius - 1] as f64;
                    out[z * w + x] = (run / window as f64) as f32;
                }
            }
            self.values = out;
        }

        // Vertical pass.
        if d > 2 * radius {
            let mut out = self.values.clone();
            for x in 0..w {
                let mut run = 0.0f64;
                for z in 0..window {
                    run += self.values[z * w + x] as f64;
                }
                out[radius * w + x] = (run / window as f64) as f32;
                for z in radius + 1..d - radius {
                    run += self.values[(z + radius) * w + x] as f64
                        - self.values[(z - radius - 1) * w + x] as f64;
                    out[z * w + x] = (run / window as f64) as f32;
                }
            }
            self.values = out;
        }

        self.touch();
        self
    }

    /// General correlation filter. The kernel sum is used as the divisor
    /// (1 when the sum is ~0); interior cells with a fully in-bounds
    /// footprint receive `clamp01(weighted_sum / divisor)`. Cells whose
    /// footprint falls partially outside the grid are left unchanged.
    /// A kernel with even or ragged dimensions is a no-op.
    pub fn convolve(&mut self, kernel: &[Vec<f32>]) -> &mut Self {
        let kd = kernel.len();
        if kd == 0 || kd % 2 == 0 {
            return self;
        }
        let kw = kernel[0].len();
        if kw == 0 || kw % 2 == 0 || kernel.iter().any(|row| row.len() != kw) {
            return self;
        }
        let rx = kw / 2;
        let rz = kd / 2;
        if self.width <= 2 * rx || self.depth <= 2 * rz {
            return self;
        }

        let mut divisor: f32 = kernel.iter().flatten().sum();
        if divisor.abs() < 1e-6 {
            divisor = 1.0;
        }

        let w = self.width;
        let mut out = self.values.clone();
        for z in rz..self.depth - rz {
            for x in rx..w - rx {
                let mut acc = 0.0f32;
                for (kz, row) in kernel.iter().enumerate() {
                    let base = (z + kz - rz) * w + x - rx;
                    for (kx, &kv) in row.iter().enumerate() {
                        acc += kv * self.values[base + kx];
                    }
                }
                out[z * w + x] = (acc / divisor).clamp(0.0, 1.0);
            }
        }
        self.values = out;
        self.touch();
        self
    }

    /// Remove single-cell spikes and pits: each cell (excluding a border
    /// of width `radius`) is clamped into the min/max of its
    /// `(2 * radius + 1)²` neighbourhood, centre excluded.
    pub fn de_noise(&mut self, radius: usize) -> &mut Self {
        if radius == 0 || self.width <= 2 * radius || self.depth <= 2 * radius {
            return self;
        }
        let w = self.width;
        let r = radius as isize;
        let mut out = self.values.clone();
        for z in radius..self.depth - radius {
            for x in radius..w - radius {
                let mut min = f32::INFINITY;
                let mut max = f32::NEG_INFINITY;
                for dz in -r..=r {
                    for dx in -r..=r {
                        if dx == 0 && dz == 0 {
                            continue;
                        }
                        let v = self.values
                            [(z as isize + dz) as usize * w + (x as isize + dx) as usize];
                        min = min.min(v);
                        max = max.max(v);
                    }
                }
                out[z * w + x] = self.values[z * w + x].clamp(min, max);
            }
        }
        self.values = out;
        self.touch();
        self
    }

    /// Dilation-like feature growth: nudge each cell halfway toward its
    /// neighbourhood maximum when that maximum exceeds the cell. Edge
    /// cells evaluate a partial (bounds-checked) neighbourhood.
    pub fn grow_edges(&mut self, radius: usize) -> &mut Self {
        self.half_step_toward_extreme(radius, true)
    }

    /// Erosion-like feature shrinkage: nudge each cell halfway toward its
    /// neighbourhood minimum when that minimum is below the cell.
    pub fn shrink_edges(&mut self, radius: usize) -> &mut Self {
        self.half_step_toward_extreme(radius, false)
    }

    fn half_step_toward_extreme(&mut self, radius: usize, grow: bool) -> &mut Self {
        if radius == 0 || self.values.is_empty() {
            return self;
        }
        let w = self.width as isize;
        let d = self.depth as isize;
        let r = radius as isize;
        let mut out = self.values.clone();
        for z in 0..d {
            for x in 0..w {
                let mut extreme = if grow { f32::NEG_INFINITY } else { f32::INFINITY };
                for dz in -r..=r {
                    for dx in -r..=r {
                        if dx == 0 && dz == 0 {
                            continue;
                        }
                        let nx = x + dx;
                        let nz = z + dz;
                        if nx < 0 || nz < 0 || nx >= w || nz >= d {
                            continue;
                        }
                        let v = self.values[(nz * w + nx) as usize];
                        extreme = if grow { extreme.max(v) } else { extreme.min(v) };
                    }
                }
                let i = (z * w + x) as usize;
                let v = self.values[i];
                if grow && extreme > v {
                    out[i] = v + (extreme - v) / 2.0;
                } else if !grow && extreme < v {
                    out[i] = v - (v - extreme) / 2.0;
                }
            }
        }
        self.values = out;
        self.touch();
        self
    }

    /// Round every cell to the nearest multiple of `step`.
    pub fn quantize(&mut self, step: f32) -> &mut Self {
        if step.abs() < f32::EPSILON {
            return self;
        }
        for v in &mut self.values {
            *v = (*v / step).round() * step;
        }
        self.touch();
        self
    }

    /// Terraced quantization. `starts` lists ascending band start heights
    /// (the last band tops out at 1.0); each band remaps the cell's
    /// relative position through its response curve:
    /// `v = start + curve((v - start) / band_height) * band_height`.
    /// Values below the first start height are left unchanged.
    pub fn quantize_terraced(
        &mut self,
        starts: &[f32],
        curves: &[ResponseCurve],
    ) -> Result<&mut Self, FieldError> {
        if starts.is_empty() {
            return Err(FieldError::EmptyTerraceSpec);
        }
        if starts.len() != curves.len() {
            return Err(FieldError::TerraceSpecLengthMismatch {
                starts: starts.len(),
                curves: curves.len(),
            });
        }
        for v in &mut self.values {
            let mut band = None;
            for (i, &start) in starts.iter().enumerate().rev() {
                if *v >= start {
                    band = Some(i);
                    break;
                }
            }
            let Some(i) = band else { continue };
            let start = starts[i];
            let top = if i + 1 < starts.len() { starts[i + 1] } else { 1.0 };
            let height = top - start;
            if height <= f32::EPSILON {
                *v = start;
                continue;
            }
            let t = ((*v - start) / height).clamp(0.0, 1.0);
            *v = start + curves[i].evaluate(t) * height;
        }
        self.touch();
        Ok(self)
    }
}
