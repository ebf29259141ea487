//! Heightmap processing and terrain-synthesis core.
//!
//! Three engine-independent components:
//!
//! - [`field::HeightField`] — a dense 2D scalar grid with in-place
//!   image-style operators, erosion simulations, derivative maps, and
//!   binary/RAW serialization.
//! - [`fractal::FractalNoiseGenerator`] — seeded fractal noise (Perlin,
//!   Billow, ridged-multifractal) used to seed heightfields.
//! - [`quadtree::RegionQuadtree`] — a point-keyed spatial index for
//!   rectangular range queries over terrain features.
//!
//! Everything is synchronous, single-threaded, and allocation-plain;
//! callers wanting parallelism partition their own tiles.
pub mod analysis;
pub mod erosion;
pub mod error;
pub mod field;
pub mod fractal;
pub mod io;
pub mod quadtree;
pub mod terrain;

pub use error::FieldError;
pub use field::arith::CopyMode;
pub use field::{HeightField, ResponseCurve};
pub use fractal::{FractalAlgorithm, FractalConfig, FractalNoiseGenerator};
pub use io::{RawBitDepth, RawByteOrder};
pub use quadtree::{Point2, Rect, RegionQuadtree};
pub use terrain::{MemoryTerrain, TerrainBackend, TerrainSize};
