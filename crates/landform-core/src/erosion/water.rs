//! Shallow-water outflow flux, shared by hydraulic erosion and the flow
//! map. `pub(crate)` only.
//!
//! The model is the classic virtual-pipes scheme reduced to its
//! essentials: per cell, flux toward each 4-connected neighbour is
//! proportional to the (height + water) differential, scaled by a fixed
//! timestep, then rescaled so a cell never sheds more water than it
//! holds. The grid boundary is closed; no water leaves the field.
use crate::field::HeightField;

/// Fixed integration step for the flux model.
pub(crate) const FLOW_TIMESTEP: f32 = 0.25;

/// Per-iteration water decay applied by hydraulic erosion.
pub(crate) const EVAPORATION_RATE: f32 = 0.015;

/// 4-connected neighbour offsets, order N, E, S, W.
pub(crate) const NEIGHBOURS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Direction opposite to `NEIGHBOURS[k]`.
pub(crate) const OPPOSITE: [usize; 4] = [2, 3, 0, 1];

/// Directional outflow per cell: `flux[k][i]` is the volume leaving cell
/// `i` toward `NEIGHBOURS[k]` this step.
pub(crate) struct OutflowField {
    pub flux: [Vec<f32>; 4],
    pub width: usize,
    pub depth: usize,
}

pub(crate) fn compute_outflow(field: &HeightField, water: &[f32]) -> OutflowField {
    let w = field.width();
    let d = field.depth();
    let n = w * d;
    let mut flux = [
        vec![0.0f32; n],
        vec![0.0f32; n],
        vec![0.0f32; n],
        vec![0.0f32; n],
    ];

    for z in 0..d {
        for x in 0..w {
            let i = z * w + x;
            let level = field.values()[i] + water[i];
            let mut total = 0.0f32;
            let mut local = [0.0f32; 4];
            for (k, (dx, dz)) in NEIGHBOURS.iter().enumerate() {
                let nx = x as isize + dx;
                let nz = z as isize + dz;
                if nx < 0 || nz < 0 || nx >= w as isize || nz >= d as isize {
                    continue;
                }
                let j = nz as usize * w + nx as usize;
                let diff = level - (field.values()[j] + water[j]);
                if diff > 0.0 {
                    local[k] = diff * FLOW_TIMESTEP;
                    total += local[k];
                }
            }
            // A cell cannot shed more water than it holds.
            if total > water[i] && total > 0.0 {
                let scale = water[i] / total;
                for f in &mut local {
                    *f *= scale;
                }
            }
            for k in 0..4 {
                flux[k][i] = local[k];
            }
        }
    }

    OutflowField {
        flux,
        width: w,
        depth: d,
    }
}

/// Move water according to an outflow field.
pub(crate) fn apply_outflow(outflow: &OutflowField, water: &mut [f32]) {
    let w = outflow.width;
    let d = outflow.depth;
    let before: Vec<f32> = water.to_vec();
    for z in 0..d {
        for x in 0..w {
            let i = z * w + x;
            let lost: f32 = (0..4).map(|k| outflow.flux[k][i]).sum();
            let mut gained = 0.0f32;
            for (k, (dx, dz)) in NEIGHBOURS.iter().enumerate() {
                let nx = x as isize + dx;
                let nz = z as isize + dz;
                if nx < 0 || nz < 0 || nx >= w as isize || nz >= d as isize {
                    continue;
                }
                let j = nz as usize * w + nx as usize;
                gained += outflow.flux[OPPOSITE[k]][j];
            }
            water[i] = (before[i] - lost + gained).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_volume_is_conserved_by_outflow() {
        let mut field = HeightField::new(8, 8);
        for z in 0..8 {
            for x in 0..8 {
                field.set(x, z, x as f32 * 0.1);
            }
        }
        let mut water = vec![0.01f32; 64];
        let before: f32 = water.iter().sum();
        for _ in 0..5 {
            let out = compute_outflow(&field, &water);
            apply_outflow(&out, &mut water);
        }
        let after: f32 = water.iter().sum();
        assert!(
            (before - after).abs() < 1e-5,
            "closed boundary must conserve water: {before} → {after}"
        );
    }

    #[test]
    fn no_cell_sheds_more_than_it_holds() {
        let mut field = HeightField::new(3, 3);
        field.set(1, 1, 1.0);
        let water = vec![0.001f32; 9];
        let out = compute_outflow(&field, &water);
        let i = 4; // centre
        let total: f32 = (0..4).map(|k| out.flux[k][i]).sum();
        assert!(total <= water[i] + 1e-7, "centre sheds {total}, holds {}", water[i]);
    }

    #[test]
    fn flux_runs_downhill_only() {
        let mut field = HeightField::new(2, 1);
        field.set(0, 0, 1.0);
        let water = vec![0.5f32; 2];
        let out = compute_outflow(&field, &water);
        // East flux from the high cell is positive; the low cell sends
        // nothing back west.
        assert!(out.flux[1][0] > 0.0);
        assert_eq!(out.flux[3][1], 0.0);
    }
}
