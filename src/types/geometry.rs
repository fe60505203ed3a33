//! Cell-space geometry shared by the mask generator and the compositor.

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::types::MapInfo;

/// Rectangle in cell indices. Region is [min.x, max.x) x [min.y, max.y),
/// x being the column and y the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRegion {
    pub min: UVec2,
    pub max: UVec2,
}

impl CellRegion {
    pub fn new(min: UVec2, max: UVec2) -> Self {
        Self { min, max }
    }

    /// Region covering a whole grid.
    pub fn full(info: &MapInfo) -> Self {
        Self {
            min: UVec2::ZERO,
            max: info.size(),
        }
    }

    /// Number of columns; zero when the region is inverted.
    #[inline]
    pub fn width(&self) -> u32 {
        self.max.x.saturating_sub(self.min.x)
    }

    /// Number of rows; zero when the region is inverted.
    #[inline]
    pub fn height(&self) -> u32 {
        self.max.y.saturating_sub(self.min.y)
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn area(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn contains(&self, cell: UVec2) -> bool {
        cell.x >= self.min.x && cell.x < self.max.x && cell.y >= self.min.y && cell.y < self.max.y
    }

    /// Intersect with the grid extents. The result always satisfies
    /// `min <= max <= info.size()` per axis.
    pub fn clip_to(&self, info: &MapInfo) -> Self {
        let max = self.max.min(info.size());
        let min = self.min.min(max);
        Self { min, max }
    }
}
