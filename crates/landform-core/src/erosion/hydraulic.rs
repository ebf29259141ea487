//! Hydraulic erosion: rainfall, shallow-water transport, sediment
//! dissolution and downhill deposition.
use super::water::{apply_outflow, compute_outflow, EVAPORATION_RATE};
use crate::error::FieldError;
use crate::field::HeightField;

/// Apply `iterations` rounds of hydraulic erosion to `field`.
///
/// * `hardness` — per-cell resistance in [0, 1]; grid-sized or empty
///   (uniform 0).
/// * `rain` — per-cell water added every `rain_frequency`-th iteration
///   (iteration 0 always rains); grid-sized or empty (no rainfall).
/// * `dissolve_rate` — sediment pickup coefficient.
/// * `sediment_out` — accumulates dissolved volume per cell across
///   iterations and across calls; resized to the grid when empty,
///   otherwise its length must match.
///
/// Each iteration: rain (on schedule), one shallow-water outflow step,
/// then sediment pickup — per cell, the positive height deltas to the
/// full 3×3 neighbourhood are summed, `water * Σdelta * dissolve_rate *
/// (1 - hardness)` dissolves out of the cell and is deposited on the
/// downhill neighbours proportional to their share of the delta sum.
/// Heights are clamped to [0, 1] and the water grid decays by a fixed
/// evaporation rate, clamped to [0, 1].
pub fn erode_hydraulic(
    field: &mut HeightField,
    iterations: u32,
    hardness: &[f32],
    rain: &[f32],
    rain_frequency: u32,
    dissolve_rate: f32,
    sediment_out: &mut Vec<f32>,
) -> Result<(), FieldError> {
    let w = field.width();
    let d = field.depth();
    let n = w * d;

    for (name_len, ok) in [
        (hardness.len(), hardness.is_empty() || hardness.len() == n),
        (rain.len(), rain.is_empty() || rain.len() == n),
    ] {
        if !ok {
            return Err(FieldError::DimensionMismatch {
                width: w,
                depth: d,
                got: name_len,
            });
        }
    }
    if sediment_out.is_empty() {
        sediment_out.resize(n, 0.0);
    } else if sediment_out.len() != n {
        return Err(FieldError::DimensionMismatch {
            width: w,
            depth: d,
            got: sediment_out.len(),
        });
    }
    if n == 0 {
        return Ok(());
    }

    let rain_frequency = rain_frequency.max(1);
    let mut water = vec![0.0f32; n];

    for iteration in 0..iterations {
        if !rain.is_empty() && iteration % rain_frequency == 0 {
            for (wv, &r) in water.iter_mut().zip(rain) {
                *wv = (*wv + r).clamp(0.0, 1.0);
            }
        }

        let outflow = compute_outflow(field, &water);
        apply_outflow(&outflow, &mut water);

        // Sediment pickup against a height snapshot, applied as one batch.
        let heights: Vec<f32> = field.values().to_vec();
        let mut delta = vec![0.0f32; n];
        for z in 0..d {
            for x in 0..w {
                let i = z * w + x;
                if water[i] <= 0.0 {
                    continue;
                }
                let here = heights[i];
                let mut total = 0.0f32;
                let mut drops = [(0usize, 0.0f32); 8];
                let mut count = 0;
                for dz in -1isize..=1 {
                    for dx in -1isize..=1 {
                        if dx == 0 && dz == 0 {
                            continue;
                        }
                        let nx = x as isize + dx;
                        let nz = z as isize + dz;
                        if nx < 0 || nz < 0 || nx >= w as isize || nz >= d as isize {
                            continue;
                        }
                        let j = nz as usize * w + nx as usize;
                        let drop = here - heights[j];
                        if drop > 0.0 {
                            drops[count] = (j, drop);
                            count += 1;
                            total += drop;
                        }
                    }
                }
                if total <= 0.0 {
                    continue;
                }
                let hard = if hardness.is_empty() { 0.0 } else { hardness[i] };
                let dissolved = water[i] * total * dissolve_rate * (1.0 - hard);
                if dissolved <= 0.0 {
                    continue;
                }
                delta[i] -= dissolved;
                for &(j, drop) in &drops[..count] {
                    delta[j] += dissolved * (drop / total);
                }
                sediment_out[i] += dissolved;
            }
        }
        for (i, dv) in delta.iter().enumerate() {
            let v = (field.values()[i] + dv).clamp(0.0, 1.0);
            let x = i % w;
            let z = i / w;
            field.set(x, z, v);
        }

        for wv in &mut water {
            *wv = (*wv * (1.0 - EVAPORATION_RATE)).clamp(0.0, 1.0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Eastward-descending ramp kept inside (0, 1) so the clamp never
    /// engages and mass bookkeeping stays exact.
    fn ramp(n: usize) -> HeightField {
        let mut field = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                field.set(x, z, 0.8 - x as f32 * 0.05);
            }
        }
        field
    }

    #[test]
    fn rejects_mismatched_rain_map() {
        let mut field = HeightField::new(4, 4);
        let mut sediment = Vec::new();
        let result = erode_hydraulic(&mut field, 1, &[], &[0.1; 3], 1, 0.1, &mut sediment);
        assert!(matches!(result, Err(FieldError::DimensionMismatch { .. })));
    }

    #[test]
    fn sediment_accumulates_on_a_rained_slope() {
        let mut field = ramp(8);
        let rain = vec![0.01f32; 64];
        let mut sediment = Vec::new();
        erode_hydraulic(&mut field, 10, &[], &rain, 2, 0.5, &mut sediment).unwrap();
        let dissolved: f32 = sediment.iter().sum();
        assert!(dissolved > 0.0, "water on a slope must pick up sediment");
    }

    #[test]
    fn transport_conserves_height_mass_away_from_clamps() {
        let mut field = ramp(8);
        let before: f64 = field.values().iter().map(|&v| v as f64).sum();
        let rain = vec![0.005f32; 64];
        let mut sediment = Vec::new();
        erode_hydraulic(&mut field, 5, &[], &rain, 1, 0.1, &mut sediment).unwrap();
        let after: f64 = field.values().iter().map(|&v| v as f64).sum();
        assert!(
            (before - after).abs() < 1e-4,
            "dissolved material is redistributed, not destroyed: {before} → {after}"
        );
    }

    #[test]
    fn full_hardness_prevents_any_erosion() {
        let mut field = ramp(8);
        let before = field.values().to_vec();
        let rain = vec![0.01f32; 64];
        let hardness = vec![1.0f32; 64];
        let mut sediment = Vec::new();
        erode_hydraulic(&mut field, 10, &hardness, &rain, 1, 0.5, &mut sediment).unwrap();
        assert_eq!(field.values(), &before[..]);
        assert!(sediment.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn no_rain_means_no_erosion() {
        let mut field = ramp(8);
        let before = field.values().to_vec();
        let mut sediment = Vec::new();
        erode_hydraulic(&mut field, 10, &[], &[], 1, 0.5, &mut sediment).unwrap();
        assert_eq!(field.values(), &before[..]);
    }

    #[test]
    fn sediment_buffer_keeps_accumulating_across_calls() {
        let mut field = ramp(8);
        let rain = vec![0.01f32; 64];
        let mut sediment = Vec::new();
        erode_hydraulic(&mut field, 5, &[], &rain, 1, 0.3, &mut sediment).unwrap();
        let first: f32 = sediment.iter().sum();
        erode_hydraulic(&mut field, 5, &[], &rain, 1, 0.3, &mut sediment).unwrap();
        let second: f32 = sediment.iter().sum();
        assert!(second > first, "accumulator must not reset between calls");
    }
}
