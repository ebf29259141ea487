//! Flow-velocity map from the shallow-water outflow model.
use crate::erosion::water::{apply_outflow, compute_outflow, OutflowField};
use crate::field::HeightField;

/// Uniform water layer used to seed the simulation.
const SEED_WATER: f32 = 1e-4;

/// Simulate `iterations` shallow-water steps over a uniform tiny water
/// layer and return the per-cell flow-velocity magnitude, normalized so
/// the strongest flow maps to 1 (a fully still field stays all-zero).
pub fn flow_map(field: &HeightField, iterations: u32) -> HeightField {
    let w = field.width();
    let d = field.depth();
    let n = w * d;
    let mut out = HeightField::new(w, d);
    if n == 0 {
        return out;
    }

    let mut water = vec![SEED_WATER; n];
    let mut last: OutflowField = compute_outflow(field, &water);
    for _ in 0..iterations {
        last = compute_outflow(field, &water);
        apply_outflow(&last, &mut water);
    }

    // Net directional flux → velocity components (E−W, S−N).
    for z in 0..d {
        for x in 0..w {
            let i = z * w + x;
            let vx = last.flux[1][i] - last.flux[3][i];
            let vz = last.flux[2][i] - last.flux[0][i];
            out.set(x, z, (vx * vx + vz * vz).sqrt());
        }
    }
    out.normalise();
    out.mark_clean();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_water_yields_an_all_zero_map() {
        let field = HeightField::new(8, 8);
        let map = flow_map(&field, 4);
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn slope_flow_normalizes_to_unit_peak() {
        let mut field = HeightField::new(8, 8);
        for z in 0..8 {
            for x in 0..8 {
                field.set(x, z, 0.9 - x as f32 * 0.1);
            }
        }
        let map = flow_map(&field, 4);
        let max = map.values().iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((max - 1.0).abs() < 1e-6, "peak flow should normalize to 1, got {max}");
        assert!(map.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn flow_concentrates_in_a_valley_channel() {
        // V-valley draining along the centre column.
        let n = 9;
        let mut field = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                let dist = (x as f32 - 4.0).abs() * 0.1;
                field.set(x, z, dist + (n - 1 - z) as f32 * 0.02);
            }
        }
        let map = flow_map(&field, 8);
        let channel = map.get(4, 4);
        let wall = map.get(0, 4);
        assert!(
            channel >= wall,
            "channel flow {channel} should not be weaker than wall flow {wall}"
        );
    }
}
