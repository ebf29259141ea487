//! Erosion simulations: thermal talus creep and shallow-water hydraulic
//! transport. Both mutate the field in place and conserve material up to
//! the [0, 1] clamp.
pub mod hydraulic;
pub mod thermal;
pub(crate) mod water;

pub use hydraulic::erode_hydraulic;
pub use thermal::erode_thermal;
