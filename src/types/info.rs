//! Grid and georeference metadata.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::types::DEGREES_PER_METER;

/// Shape and metric placement of a depth grid.
///
/// `width` counts columns (x) and `height` counts rows (y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    /// Meters per pixel.
    pub resolution: f32,
    /// Origin of cell (0, 0) in world coordinates (meters).
    pub origin: Vec2,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 70,
            height: 1000,
            resolution: 0.1,
            origin: Vec2::ZERO,
        }
    }
}

impl MapInfo {
    pub fn new(width: u32, height: u32, resolution: f32) -> Self {
        Self {
            width,
            height,
            resolution,
            ..Default::default()
        }
    }

    /// Grid size as (columns, rows).
    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Width of the map in world units (meters).
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.resolution
    }

    /// Height of the map in world units (meters).
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.resolution
    }
}

/// Latitude/longitude placement of a grid. Not interpreted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub degrees_per_pixel: f64,
}

impl GeoReference {
    /// Georeference with the cell size derived from the grid resolution.
    pub fn from_resolution(origin_lat: f64, origin_lon: f64, resolution_m: f32) -> Self {
        Self {
            origin_lat,
            origin_lon,
            degrees_per_pixel: resolution_m as f64 * DEGREES_PER_METER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_extent_follows_resolution() {
        let info = MapInfo::new(70, 1000, 0.1);
        assert!((info.world_width() - 7.0).abs() < 1e-4);
        assert!((info.world_height() - 100.0).abs() < 1e-3);
        assert_eq!(info.cell_count(), 70_000);
        assert_eq!(info.size(), UVec2::new(70, 1000));
    }

    #[test]
    fn georeference_cell_size_scales_with_resolution() {
        let geo = GeoReference::from_resolution(28.6139, 77.2090, 0.1);
        assert!((geo.degrees_per_pixel - 0.0000009).abs() < 1e-12);
        assert_eq!(geo.origin_lat, 28.6139);
    }
}
