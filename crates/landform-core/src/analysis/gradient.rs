//! Shared finite-difference stencils used by the derivative maps.
//! `pub(crate)` only — not re-exported from analysis/mod.rs.
use crate::field::HeightField;

/// The 3×3 edge-clamped neighbourhood around `(x, z)`.
///
/// ```text
///   nw(-1,-1)  n( 0,-1)  ne(+1,-1)
///   w (-1, 0)  c         e (+1, 0)
///   sw(-1,+1)  s( 0,+1)  se(+1,+1)
/// ```
pub(crate) struct Stencil3 {
    pub nw: f32,
    pub n: f32,
    pub ne: f32,
    pub w: f32,
    pub c: f32,
    pub e: f32,
    pub sw: f32,
    pub s: f32,
    pub se: f32,
}

pub(crate) fn stencil3(field: &HeightField, x: usize, z: usize) -> Stencil3 {
    let xi = x as isize;
    let zi = z as isize;
    Stencil3 {
        nw: field.get_clamped(xi - 1, zi - 1),
        n: field.get_clamped(xi, zi - 1),
        ne: field.get_clamped(xi + 1, zi - 1),
        w: field.get_clamped(xi - 1, zi),
        c: field.get_clamped(xi, zi),
        e: field.get_clamped(xi + 1, zi),
        sw: field.get_clamped(xi - 1, zi + 1),
        s: field.get_clamped(xi, zi + 1),
        se: field.get_clamped(xi + 1, zi + 1),
    }
}

/// Edge-clamped central-difference gradient:
/// `((e − w) / 2, (s − n) / 2)`.
pub(crate) fn central_gradient(field: &HeightField, x: usize, z: usize) -> (f32, f32) {
    let xi = x as isize;
    let zi = z as isize;
    let dx = (field.get_clamped(xi + 1, zi) - field.get_clamped(xi - 1, zi)) * 0.5;
    let dz = (field.get_clamped(xi, zi + 1) - field.get_clamped(xi, zi - 1)) * 0.5;
    (dx, dz)
}
