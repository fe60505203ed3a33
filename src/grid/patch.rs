//! Depth contribution of a single damage feature before it is merged.

use crate::types::{CellRegion, SurfaceError};

/// Rectangular depth patch anchored at `region.min` in grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPatch {
    region: CellRegion,
    data: Vec<f32>,
}

impl LocalPatch {
    /// `data` is row-major and must hold exactly `region.area()` values.
    pub fn new(region: CellRegion, data: Vec<f32>) -> Result<Self, SurfaceError> {
        if data.len() != region.area() {
            return Err(SurfaceError::InvalidMetadata(format!(
                "patch data length {} does not match region {}x{}",
                data.len(),
                region.width(),
                region.height()
            )));
        }
        Ok(Self { region, data })
    }

    pub fn region(&self) -> &CellRegion {
        &self.region
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Values of local row `row`.
    pub(crate) fn row(&self, row: u32) -> &[f32] {
        let w = self.region.width() as usize;
        let start = row as usize * w;
        &self.data[start..start + w]
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}
