//! The engine-facing seam.
//!
//! The core never talks to an engine directly; it consumes a grid of
//! height samples plus the terrain's physical size, and hands a
//! processed grid back. Engine adapters implement [`TerrainBackend`]
//! outside this crate; [`MemoryTerrain`] backs the tools and tests.
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::HeightField;

/// Physical terrain dimensions in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSize {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub trait TerrainBackend {
    /// Read the terrain's current heights and physical size.
    fn load_grid(&self) -> Result<(HeightField, TerrainSize), FieldError>;

    /// Write a processed grid back. Implementations must resample
    /// through the normalized bilinear accessor when the grid's
    /// dimensions differ from the terrain's native resolution.
    fn save_grid(&mut self, field: &HeightField) -> Result<(), FieldError>;
}

/// A terrain held entirely in memory at a fixed square resolution.
pub struct MemoryTerrain {
    resolution: usize,
    size: TerrainSize,
    heights: HeightField,
}

impl MemoryTerrain {
    pub fn new(resolution: usize, size: TerrainSize) -> Self {
        Self {
            resolution,
            size,
            heights: HeightField::new(resolution, resolution),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn heights(&self) -> &HeightField {
        &self.heights
    }
}

impl TerrainBackend for MemoryTerrain {
    fn load_grid(&self) -> Result<(HeightField, TerrainSize), FieldError> {
        Ok((self.heights.clone(), self.size))
    }

    fn save_grid(&mut self, field: &HeightField) -> Result<(), FieldError> {
        let mut incoming =
            if field.width() == self.resolution && field.depth() == self.resolution {
                field.clone()
            } else {
                field.resampled(self.resolution, self.resolution)
            };
        incoming.mark_clean();
        self.heights = incoming;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> TerrainSize {
        TerrainSize {
            x: 1000.0,
            y: 600.0,
            z: 1000.0,
        }
    }

    #[test]
    fn load_returns_grid_and_physical_size() {
        let terrain = MemoryTerrain::new(16, size());
        let (field, dims) = terrain.load_grid().unwrap();
        assert_eq!(field.width(), 16);
        assert_eq!(dims.y, 600.0);
    }

    #[test]
    fn save_resamples_to_native_resolution() {
        let mut terrain = MemoryTerrain::new(8, size());
        let mut field = HeightField::new(32, 32);
        field.fill(0.75);
        terrain.save_grid(&field).unwrap();
        assert_eq!(terrain.heights().width(), 8);
        for &v in terrain.heights().values() {
            assert!((v - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn round_trip_through_backend_preserves_same_resolution_grid() {
        let mut terrain = MemoryTerrain::new(4, size());
        let mut field = HeightField::new(4, 4);
        field.set(2, 1, 0.6);
        terrain.save_grid(&field).unwrap();
        let (loaded, _) = terrain.load_grid().unwrap();
        assert_eq!(loaded.values(), field.values());
        assert!(!loaded.is_dirty());
    }
}
