//! A single synthesized damage feature.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{CellRegion, FOOTPRINT_RADII, MapInfo, SurfaceError};

/// Severity label of a damage feature. The numbers behind each label live in
/// the tier table, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Small,
    Medium,
    Large,
}

/// Pothole-like defect in pixel coordinates.
///
/// `center` and `radii` use x for the column axis and y for the row axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageFeature {
    pub center: Vec2,
    pub radii: Vec2,
    /// Rotation in degrees, in `[0, 360)`.
    pub rotation_deg: f32,
    /// Deepest point of the feature in centimeters.
    pub max_depth: f32,
    pub severity: Severity,
}

impl DamageFeature {
    pub fn new(
        center: Vec2,
        radii: Vec2,
        rotation_deg: f32,
        max_depth: f32,
        severity: Severity,
    ) -> Result<Self, SurfaceError> {
        let feature = Self {
            center,
            radii,
            rotation_deg: normalize_degrees(rotation_deg),
            max_depth,
            severity,
        };
        feature.validate()?;
        Ok(feature)
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        validate_geometry(self.center, self.radii, self.rotation_deg, self.max_depth)
    }

    /// Bounding box `center ± FOOTPRINT_RADII × radius` per axis, clipped to the grid.
    pub fn footprint(&self, info: &MapInfo) -> CellRegion {
        let half = self.radii * FOOTPRINT_RADII;
        let lo = (self.center - half).floor().max(Vec2::ZERO);
        let hi = (self.center + half).floor().max(Vec2::ZERO);
        CellRegion::new(lo.as_uvec2(), hi.as_uvec2()).clip_to(info)
    }

    /// Feature center relative to the top-left corner of `region`.
    pub fn local_center(&self, region: &CellRegion) -> Vec2 {
        self.center - region.min.as_vec2()
    }
}

pub(crate) fn validate_geometry(
    center: Vec2,
    radii: Vec2,
    rotation_deg: f32,
    max_depth: f32,
) -> Result<(), SurfaceError> {
    if !(radii.cmpgt(Vec2::ZERO).all() && radii.recip().is_finite()) {
        return Err(SurfaceError::Geometry(format!(
            "radii must be positive and finite, got ({}, {})",
            radii.y, radii.x
        )));
    }
    if !center.is_finite() {
        return Err(SurfaceError::Geometry(format!(
            "center must be finite, got ({}, {})",
            center.y, center.x
        )));
    }
    if !rotation_deg.is_finite() {
        return Err(SurfaceError::Geometry(format!(
            "rotation must be finite, got {rotation_deg}"
        )));
    }
    if !max_depth.is_finite() {
        return Err(SurfaceError::Geometry(format!(
            "max depth must be finite, got {max_depth}"
        )));
    }
    Ok(())
}

/// Reduce an angle to `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
