//! Steepness metrics: forward-difference magnitude, the degrees-like
//! interpolated variant, and the bounded normalized map.
use super::gradient::central_gradient;
use crate::field::HeightField;

/// Scale factor turning a normalized-space central difference into the
/// degrees-like steepness metric.
const STEEPNESS_SCALE: f32 = 10_000.0;

/// Forward-difference gradient magnitude at integer coordinates. Reads
/// are edge-clamped, so the last row/column degrade to a zero forward
/// difference instead of indexing out of bounds.
pub fn slope_at(field: &HeightField, x: usize, z: usize) -> f32 {
    let xi = x as isize;
    let zi = z as isize;
    let here = field.get_clamped(xi, zi);
    let dx = field.get_clamped(xi + 1, zi) - here;
    let dz = field.get_clamped(xi, zi + 1) - here;
    (dx * dx + dz * dz).sqrt()
}

/// A same-size map of [`slope_at`] at every cell.
pub fn slope_map(field: &HeightField) -> HeightField {
    let mut out = HeightField::new(field.width(), field.depth());
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let s = slope_at(field, x, z);
            out.set(x, z, s);
        }
    }
    out
}

/// Degrees-like steepness at normalized coordinates: central difference
/// of bilinear samples taken at ±0.9 of one grid-cell width, scaled by
/// 10000 and clamped to [0, 90]. An approximation, not a true slope
/// angle.
pub fn slope_interpolated(field: &HeightField, x: f32, z: f32) -> f32 {
    if field.width() < 2 || field.depth() < 2 {
        return 0.0;
    }
    let ux = 0.9 / (field.width() - 1) as f32;
    let uz = 0.9 / (field.depth() - 1) as f32;
    let dx = field.sample(x + ux, z) - field.sample(x - ux, z);
    let dz = field.sample(x, z + uz) - field.sample(x, z - uz);
    ((dx * dx + dz * dz).sqrt() * STEEPNESS_SCALE).clamp(0.0, 90.0)
}

/// Bounded-to-[0, 1) slope map: `g / sqrt(1 + g²)` where `g` is the
/// half-scaled central-difference gradient magnitude.
pub fn normalized_slope_map(field: &HeightField) -> HeightField {
    let mut out = HeightField::new(field.width(), field.depth());
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let (dx, dz) = central_gradient(field, x, z);
            let g = (dx * dx + dz * dz).sqrt();
            out.set(x, z, g / (1.0 + g * g).sqrt());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Eastward ramp rising `rise` per cell.
    fn ramp(n: usize, rise: f32) -> HeightField {
        let mut field = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                field.set(x, z, x as f32 * rise);
            }
        }
        field
    }

    #[test]
    fn slope_of_flat_field_is_zero() {
        let field = HeightField::new(8, 8);
        assert_eq!(slope_at(&field, 3, 3), 0.0);
        assert!(slope_map(&field).values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn slope_of_ramp_matches_rise() {
        let field = ramp(8, 0.05);
        assert_relative_eq!(slope_at(&field, 3, 3), 0.05, max_relative = 1e-5);
        // Last column: clamped forward difference degrades to zero.
        assert_eq!(slope_at(&field, 7, 3), 0.0);
    }

    #[test]
    fn interpolated_slope_clamps_to_ninety() {
        let mut field = HeightField::new(4, 4);
        for z in 0..4 {
            for x in 2..4 {
                field.set(x, z, 1.0);
            }
        }
        let steep = slope_interpolated(&field, 0.5, 0.5);
        assert_eq!(steep, 90.0);
        let flat = slope_interpolated(&HeightField::new(4, 4), 0.5, 0.5);
        assert_eq!(flat, 0.0);
    }

    #[test]
    fn normalized_slope_stays_below_one() {
        let field = ramp(8, 0.9);
        let map = normalized_slope_map(&field);
        for &v in map.values() {
            assert!((0.0..1.0).contains(&v), "normalized slope {v} out of [0, 1)");
        }
        // Interior gradient: g = 0.45, g/sqrt(1+g²) ≈ 0.4103.
        assert_relative_eq!(map.get(4, 4), 0.4103, epsilon = 1e-3);
    }
}
