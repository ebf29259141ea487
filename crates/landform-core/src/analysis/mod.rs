//! Read-only derivative-map producers over a heightfield.
//!
//! Each producer returns a new grid of the same dimensions; the input is
//! never mutated.
pub mod aspect;
pub mod curvature;
pub mod flow;
mod gradient;
pub mod slope;

pub use aspect::{aspect_map, AspectKind};
pub use curvature::{curvature_map, CurvatureKind};
pub use flow::flow_map;
pub use slope::{normalized_slope_map, slope_at, slope_interpolated, slope_map};
