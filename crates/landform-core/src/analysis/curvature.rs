//! Horizontal/vertical surface curvature from 3×3 finite differences.
use serde::{Deserialize, Serialize};

use super::gradient::stencil3;
use crate::field::HeightField;

/// Curvature magnitudes beyond this limit are clipped before remapping.
const CURVATURE_LIMIT: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurvatureKind {
    /// Mean of horizontal and vertical curvature.
    Average,
    /// Plan (contour) curvature.
    Horizontal,
    /// Profile (down-slope) curvature.
    Vertical,
}

/// Build a curvature map. Derivatives use standard 3×3 stencils with
/// boundary cells repeating the edge; curvature is clamped to
/// ±10000 and rescaled to [0, 1] (`k / limit * 0.5 + 0.5`), with
/// non-finite results treated as 0 (mid-gray) first.
pub fn curvature_map(field: &HeightField, kind: CurvatureKind) -> HeightField {
    let mut out = HeightField::new(field.width(), field.depth());
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let s = stencil3(field, x, z);
            let dx = (s.e - s.w) * 0.5;
            let dy = (s.s - s.n) * 0.5;
            let dxx = s.e - 2.0 * s.c + s.w;
            let dyy = s.s - 2.0 * s.c + s.n;
            let dxy = (s.se - s.sw - s.ne + s.nw) * 0.25;

            let p = dx * dx + dy * dy;
            let kh = -2.0 * (dy * dy * dxx + dx * dx * dyy - dx * dy * dxy) / p;
            let kv = -2.0 * (dx * dx * dxx + dy * dy * dyy + dx * dy * dxy) / p;
            let kh = sanitize(kh);
            let kv = sanitize(kv);

            let k = match kind {
                CurvatureKind::Horizontal => kh,
                CurvatureKind::Vertical => kv,
                CurvatureKind::Average => (kh + kv) * 0.5,
            };
            out.set(x, z, k / CURVATURE_LIMIT * 0.5 + 0.5);
        }
    }
    out
}

#[inline]
fn sanitize(k: f32) -> f32 {
    if k.is_finite() {
        k.clamp(-CURVATURE_LIMIT, CURVATURE_LIMIT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_field_maps_to_mid_gray() {
        let field = HeightField::new(8, 8);
        for kind in [
            CurvatureKind::Average,
            CurvatureKind::Horizontal,
            CurvatureKind::Vertical,
        ] {
            let map = curvature_map(&field, kind);
            for &v in map.values() {
                assert_eq!(v, 0.5, "flat field must be mid-gray for {kind:?}");
            }
        }
    }

    #[test]
    fn ridge_and_valley_fall_on_opposite_sides_of_mid_gray() {
        let n = 9;
        let mut ridge = HeightField::new(n, n);
        let mut valley = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                let d = (x as f32 - 4.0) / 4.0;
                ridge.set(x, z, 1.0 - d * d);
                valley.set(x, z, d * d);
            }
        }
        let rv = curvature_map(&ridge, CurvatureKind::Vertical);
        let vv = curvature_map(&valley, CurvatureKind::Vertical);
        // Sample on the flank (the exact crest has zero gradient, where
        // curvature is defined as 0 → mid-gray). A convex flank and a
        // concave flank must sit on opposite sides of 0.5.
        let convex = rv.get(3, 4);
        let concave = vv.get(3, 4);
        assert!(
            (convex - 0.5) * (concave - 0.5) < 0.0,
            "convex {convex} and concave {concave} should straddle 0.5"
        );
    }

    #[test]
    fn all_outputs_lie_in_unit_range() {
        let n = 16;
        let mut field = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                field.set(x, z, ((x * 7 + z * 13) % 11) as f32 / 11.0);
            }
        }
        let map = curvature_map(&field, CurvatureKind::Average);
        for &v in map.values() {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
