use glam::{UVec2, Vec2};

use crate::types::{CellRegion, MapInfo, SurfaceError};

/// Row-major 2D grid. Cell `(x, y)` is column `x` of row `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, SurfaceError> {
        let expected_len = info.cell_count();
        if data.len() != expected_len {
            return Err(SurfaceError::InvalidMetadata(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }

        Ok(Self { info, data })
    }

    pub fn filled(info: MapInfo, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; info.cell_count()],
            info,
        }
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, pos: UVec2) -> Option<&T> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return None;
        }
        let idx = self.index(pos);
        Some(&self.data[idx])
    }

    pub fn set(&mut self, pos: UVec2, value: T) -> Result<(), SurfaceError> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return Err(SurfaceError::OutOfBounds(format!(
                "cell ({}, {}) out of bounds for map {}x{}",
                pos.x, pos.y, self.info.width, self.info.height
            )));
        }
        let idx = self.index(pos);
        self.data[idx] = value;
        Ok(())
    }

    /// Mutable slice of row `y` restricted to columns `[x0, x1)`.
    ///
    /// Callers must pass a range inside the grid.
    pub(crate) fn row_span_mut(&mut self, y: u32, x0: u32, x1: u32) -> &mut [T] {
        let start = self.index(UVec2::new(x0, y));
        let end = start + (x1 - x0) as usize;
        &mut self.data[start..end]
    }

    /// Immutable counterpart of [`Self::row_span_mut`].
    pub(crate) fn row_span(&self, y: u32, x0: u32, x1: u32) -> &[T] {
        let start = self.index(UVec2::new(x0, y));
        let end = start + (x1 - x0) as usize;
        &self.data[start..end]
    }

    fn index(&self, pos: UVec2) -> usize {
        (pos.y as usize) * (self.info.width as usize) + (pos.x as usize)
    }

    pub fn map_to_world(&self, pos: &Vec2) -> Vec2 {
        Vec2::new(
            self.info.origin.x + pos.x * self.info.resolution,
            self.info.origin.y + pos.y * self.info.resolution,
        )
    }

    pub fn region(&self) -> CellRegion {
        CellRegion::full(&self.info)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl Grid2d<f32> {
    /// Zero-filled depth grid.
    pub fn zeros(info: MapInfo) -> Self {
        Self::filled(info, 0.0)
    }

    /// Largest value in the grid, or 0 for an empty grid.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_to_world_scales_by_resolution_from_origin() {
        let mut info = MapInfo::new(10, 10, 0.25);
        info.origin = Vec2::new(-1.0, 2.0);
        let grid = Grid2d::zeros(info);

        assert_eq!(grid.map_to_world(&Vec2::ZERO), Vec2::new(-1.0, 2.0));
        assert_eq!(grid.map_to_world(&Vec2::new(4.0, 2.0)), Vec2::new(0.0, 2.5));
    }

    #[test]
    fn new_rejects_mismatched_data() {
        let info = MapInfo::new(3, 2, 0.1);
        assert!(Grid2d::new(info, vec![0.0f32; 6]).is_ok());
        assert!(matches!(
            Grid2d::new(info, vec![0.0f32; 5]),
            Err(SurfaceError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn get_and_set_are_row_major_and_bounds_checked() {
        let mut grid = Grid2d::zeros(MapInfo::new(3, 2, 0.1));
        grid.set(UVec2::new(2, 1), 4.5).unwrap();
        assert_eq!(grid.data()[5], 4.5);
        assert_eq!(grid.get(UVec2::new(2, 1)), Some(&4.5));
        assert_eq!(grid.get(UVec2::new(3, 0)), None);
        assert!(matches!(
            grid.set(UVec2::new(0, 2), 1.0),
            Err(SurfaceError::OutOfBounds(_))
        ));
        assert_eq!(grid.max_value(), 4.5);
    }
}
