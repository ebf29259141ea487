//! Thermal (talus creep) erosion.
//!
//! Material moves only while the steepest downhill difference lies
//! inside the talus band: below `talus_min` the slope is stable, above
//! `talus_max` the move is skipped as well, a deliberate ceiling that
//! keeps cliffs from collapsing in a single pass.
use crate::error::FieldError;
use crate::field::HeightField;

/// Apply `iterations` passes of talus-threshold creep to `field`.
///
/// * `hardness` — per-cell resistance in [0, 1]; length must equal the
///   grid size or be empty (treated as uniform 0, fully erodible).
///
/// For each interior cell, the steepest positive difference to its
/// 4-connected neighbours is found; when it falls within
/// `[talus_min, talus_max]`, half of it (scaled by `1 - hardness`) moves
/// from the cell to that neighbour. Mass is conserved exactly.
pub fn erode_thermal(
    field: &mut HeightField,
    iterations: u32,
    talus_min: f32,
    talus_max: f32,
    hardness: &[f32],
) -> Result<(), FieldError> {
    if talus_min > talus_max {
        return Err(FieldError::InvalidTalusBand {
            min: talus_min,
            max: talus_max,
        });
    }
    let w = field.width();
    let d = field.depth();
    if !hardness.is_empty() && hardness.len() != w * d {
        return Err(FieldError::DimensionMismatch {
            width: w,
            depth: d,
            got: hardness.len(),
        });
    }
    if w < 3 || d < 3 {
        return Ok(());
    }

    const OFFSETS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    for _ in 0..iterations {
        for z in 1..d - 1 {
            for x in 1..w - 1 {
                let here = field.get(x, z);
                let mut steepest = 0.0f32;
                let mut target = None;
                for (dx, dz) in OFFSETS {
                    let nx = (x as isize + dx) as usize;
                    let nz = (z as isize + dz) as usize;
                    let diff = here - field.get(nx, nz);
                    if diff > steepest {
                        steepest = diff;
                        target = Some((nx, nz));
                    }
                }
                let Some((nx, nz)) = target else { continue };
                if steepest < talus_min || steepest > talus_max {
                    continue;
                }
                let hard = if hardness.is_empty() {
                    0.0
                } else {
                    hardness[z * w + x]
                };
                let moved = steepest * 0.5 * (1.0 - hard);
                field.set(x, z, here - moved);
                let below = field.get(nx, nz);
                field.set(nx, nz, below + moved);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(field: &HeightField) -> f64 {
        field.values().iter().map(|&v| v as f64).sum()
    }

    #[test]
    fn rejects_inverted_talus_band() {
        let mut field = HeightField::new(4, 4);
        let result = erode_thermal(&mut field, 1, 0.5, 0.1, &[]);
        assert!(matches!(result, Err(FieldError::InvalidTalusBand { .. })));
    }

    #[test]
    fn rejects_mismatched_hardness_mask() {
        let mut field = HeightField::new(4, 4);
        let result = erode_thermal(&mut field, 1, 0.0, 1.0, &[0.0; 3]);
        assert!(matches!(result, Err(FieldError::DimensionMismatch { .. })));
    }

    #[test]
    fn one_iteration_conserves_total_mass() {
        let mut field = HeightField::new(3, 3);
        field.set(0, 0, 1.0);
        let before = total(&field);
        erode_thermal(&mut field, 1, 0.0, 1.0, &[]).unwrap();
        let after = total(&field);
        assert!(
            (before - after).abs() < 1e-6,
            "thermal erosion created or destroyed material: {before} → {after}"
        );
    }

    #[test]
    fn interior_spike_sheds_half_its_prominence() {
        let mut field = HeightField::new(5, 5);
        field.set(2, 2, 1.0);
        let before = total(&field);
        erode_thermal(&mut field, 1, 0.0, 1.0, &[]).unwrap();
        assert_eq!(field.get(2, 2), 0.5);
        assert!((total(&field) - before).abs() < 1e-6);
    }

    #[test]
    fn differences_above_the_talus_ceiling_do_not_move() {
        let mut field = HeightField::new(5, 5);
        field.set(2, 2, 1.0);
        let before = field.values().to_vec();
        erode_thermal(&mut field, 1, 0.0, 0.4, &[]).unwrap();
        assert_eq!(field.values(), &before[..], "cliff above talus_max must not erode");
    }

    #[test]
    fn hardness_scales_the_moved_volume() {
        let mut soft = HeightField::new(5, 5);
        soft.set(2, 2, 1.0);
        let mut hard = soft.clone();
        let mask = vec![0.75f32; 25];
        erode_thermal(&mut soft, 1, 0.0, 1.0, &[]).unwrap();
        erode_thermal(&mut hard, 1, 0.0, 1.0, &mask).unwrap();
        // Soft rock moves 0.5; rock at hardness 0.75 moves a quarter of that.
        assert_eq!(soft.get(2, 2), 0.5);
        assert_eq!(hard.get(2, 2), 0.875);
    }
}
