//! Compass-direction (aspect) maps from the surface gradient.
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use super::gradient::central_gradient;
use crate::field::HeightField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectKind {
    /// Facing direction normalized to [0, 1] (0 = north, 0.25 = east).
    Aspect,
    /// Cosine projection of the facing direction, remapped to [0, 1].
    Northerness,
    /// Sine projection of the facing direction, remapped to [0, 1].
    Easterness,
}

/// Build an aspect map. The facing angle comes from
/// `acos(-dz / gradient_magnitude)` with a sign-based quadrant
/// correction on the east component; flat or non-finite cells yield 0.
pub fn aspect_map(field: &HeightField, kind: AspectKind) -> HeightField {
    let mut out = HeightField::new(field.width(), field.depth());
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let (dx, dz) = central_gradient(field, x, z);
            let magnitude = (dx * dx + dz * dz).sqrt();

            let mut angle = (-dz / magnitude).clamp(-1.0, 1.0).acos();
            if !angle.is_finite() {
                angle = 0.0;
            } else if dx < 0.0 {
                angle = 2.0 * PI - angle;
            }

            let v = match kind {
                AspectKind::Aspect => angle / (2.0 * PI),
                AspectKind::Northerness => angle.cos() * 0.5 + 0.5,
                AspectKind::Easterness => angle.sin() * 0.5 + 0.5,
            };
            out.set(x, z, if v.is_finite() { v } else { 0.0 });
        }
    }
    out
}
