//! Synthesis configuration and its YAML form.
//!
//! ```yaml
//! road:
//!   width_m: 7.0
//!   length_m: 100.0
//!   resolution_m: 0.1
//!   length_axis: rows
//! feature_count: { min: 15, max: 40 }
//! margin: [5, 3]
//! tiers:
//!   - { severity: large, weight: 0.2, depth_cm: { min: 5.0, max: 9.0 }, radius_px: { min: 5.0, max: 10.0 } }
//!   - { severity: small, weight: 0.8, depth_cm: { min: 0.5, max: 2.5 }, radius_px: { min: 1.0, max: 3.0 } }
//! georeference: { origin_lat: 28.6139, origin_lon: 77.2090, degrees_per_pixel: 0.0000009 }
//! clusters:
//!   - centers: { min: [50, 10], max: [150, 42] }
//!     count: { min: 15, max: 15 }
//!     aspect: { min: 0.8, max: 1.2 }
//!     tiers:
//!       - { severity: large, weight: 1.0, depth_cm: { min: 5.0, max: 9.0 }, radius_px: { min: 3.0, max: 7.0 } }
//! ```

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::synthesis::{TierTable, ValueRange};
use crate::types::{
    ASPECT_JITTER_MAX, ASPECT_JITTER_MIN, CellRegion, GeoReference, MapInfo, SurfaceError,
};

/// Which grid axis runs along the road.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthAxis {
    /// One row per resolution step along the road; columns span its width.
    #[default]
    Rows,
    /// One column per resolution step along the road; rows span its width.
    Cols,
}

/// Physical road segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadDimensions {
    #[serde(deserialize_with = "deserialize_positive")]
    pub width_m: f32,
    #[serde(deserialize_with = "deserialize_positive")]
    pub length_m: f32,
    /// Meters per pixel.
    #[serde(deserialize_with = "deserialize_positive")]
    pub resolution_m: f32,
    #[serde(default)]
    pub length_axis: LengthAxis,
}

impl Default for RoadDimensions {
    fn default() -> Self {
        Self {
            width_m: 7.0,
            length_m: 100.0,
            resolution_m: 0.1,
            length_axis: LengthAxis::Rows,
        }
    }
}

impl RoadDimensions {
    pub fn new(width_m: f32, length_m: f32, resolution_m: f32) -> Self {
        Self {
            width_m,
            length_m,
            resolution_m,
            length_axis: LengthAxis::Rows,
        }
    }

    pub fn with_length_axis(mut self, axis: LengthAxis) -> Self {
        self.length_axis = axis;
        self
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        for (name, value) in [
            ("road width", self.width_m),
            ("road length", self.length_m),
            ("resolution", self.resolution_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SurfaceError::Configuration(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Grid shape for this road: `round(extent / resolution)` cells per axis.
    pub fn map_info(&self) -> Result<MapInfo, SurfaceError> {
        self.validate()?;
        let along = cells(self.length_m, self.resolution_m)?;
        let across = cells(self.width_m, self.resolution_m)?;
        let (width, height) = match self.length_axis {
            LengthAxis::Rows => (across, along),
            LengthAxis::Cols => (along, across),
        };
        Ok(MapInfo::new(width, height, self.resolution_m))
    }
}

fn cells(extent_m: f32, resolution_m: f32) -> Result<u32, SurfaceError> {
    let count = (extent_m as f64 / resolution_m as f64).round();
    if count < 1.0 || count > u32::MAX as f64 {
        return Err(SurfaceError::Configuration(format!(
            "{extent_m} m at {resolution_m} m/px gives {count} cells"
        )));
    }
    Ok(count as u32)
}

/// Inclusive range of feature counts per grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.min > self.max {
            return Err(SurfaceError::Configuration(format!(
                "feature count range is empty: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for CountRange {
    fn default() -> Self {
        Self::new(15, 40)
    }
}

fn default_margin() -> UVec2 {
    UVec2::new(5, 3)
}

fn default_aspect() -> ValueRange {
    ValueRange::new(ASPECT_JITTER_MIN, ASPECT_JITTER_MAX)
}

/// A cluster of damage: features whose centers fall inside one window of the
/// grid, with their own count and tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    /// Cells feature centers are drawn from (x = columns, y = rows, max exclusive).
    /// Clipped to the grid when the synthesizer is built.
    pub centers: CellRegion,
    pub count: CountRange,
    #[serde(default)]
    pub tiers: TierTable,
    /// Column radius as a multiple of the row radius.
    #[serde(default = "default_aspect")]
    pub aspect: ValueRange,
}

impl ClusterGroup {
    pub fn new(centers: CellRegion, count: CountRange, tiers: TierTable) -> Self {
        Self {
            centers,
            count,
            tiers,
            aspect: default_aspect(),
        }
    }

    pub fn with_aspect(mut self, aspect: ValueRange) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.centers.is_empty() {
            return Err(SurfaceError::Configuration(format!(
                "cluster center window is empty: {:?}..{:?}",
                self.centers.min, self.centers.max
            )));
        }
        self.count.validate()?;
        self.aspect.validate("aspect")?;
        if self.aspect.min <= 0.0 {
            return Err(SurfaceError::Configuration(format!(
                "aspect must be positive, got {}",
                self.aspect.min
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub road: RoadDimensions,
    #[serde(default)]
    pub tiers: TierTable,
    #[serde(default)]
    pub feature_count: CountRange,
    /// Border strip in cells (x = columns, y = rows) that feature centers avoid.
    #[serde(default = "default_margin")]
    pub margin: UVec2,
    #[serde(default)]
    pub georeference: Option<GeoReference>,
    /// Clustered damage drawn in addition to the dispersed `feature_count`.
    #[serde(default)]
    pub clusters: Vec<ClusterGroup>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            road: RoadDimensions::default(),
            tiers: TierTable::default(),
            feature_count: CountRange::default(),
            margin: default_margin(),
            georeference: None,
            clusters: Vec::new(),
        }
    }
}

impl SynthesisConfig {
    pub fn new(road: RoadDimensions, tiers: TierTable, feature_count: CountRange) -> Self {
        Self {
            road,
            tiers,
            feature_count,
            ..Default::default()
        }
    }

    pub fn with_margin(mut self, margin: UVec2) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_georeference(mut self, georeference: GeoReference) -> Self {
        self.georeference = Some(georeference);
        self
    }

    pub fn with_cluster(mut self, cluster: ClusterGroup) -> Self {
        self.clusters.push(cluster);
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SurfaceError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check road shape, feature counts and clusters. Tier tables validate
    /// themselves when built.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        let info = self.road.map_info()?;
        self.feature_count.validate()?;
        for (index, cluster) in self.clusters.iter().enumerate() {
            cluster.validate()?;
            if cluster.centers.clip_to(&info).is_empty() {
                return Err(SurfaceError::Configuration(format!(
                    "cluster {index} lies outside the {}x{} grid",
                    info.width, info.height
                )));
            }
        }
        Ok(())
    }
}

fn deserialize_positive<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "physical dimensions must be positive",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_rounds_extent_over_resolution() {
        let info = RoadDimensions::new(7.0, 100.0, 0.1).map_info().unwrap();
        assert_eq!((info.height, info.width), (1000, 70));

        let info = RoadDimensions::new(13.0, 100.0, 0.25)
            .with_length_axis(LengthAxis::Cols)
            .map_info()
            .unwrap();
        assert_eq!((info.height, info.width), (52, 400));

        // 1.06 / 0.25 = 4.24 rounds down, 1.14 / 0.25 = 4.56 rounds up.
        let info = RoadDimensions::new(1.06, 1.14, 0.25).map_info().unwrap();
        assert_eq!((info.height, info.width), (5, 4));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        for road in [
            RoadDimensions::new(0.0, 100.0, 0.1),
            RoadDimensions::new(7.0, -1.0, 0.1),
            RoadDimensions::new(7.0, 100.0, 0.0),
            RoadDimensions::new(7.0, 100.0, f32::NAN),
            RoadDimensions::new(0.01, 100.0, 0.1),
        ] {
            assert!(matches!(
                road.map_info(),
                Err(SurfaceError::Configuration(_))
            ));
        }
    }

    #[test]
    fn empty_count_range_is_rejected() {
        assert!(CountRange::new(3, 3).validate().is_ok());
        assert!(matches!(
            CountRange::new(4, 3).validate(),
            Err(SurfaceError::Configuration(_))
        ));
    }

    #[test]
    fn yaml_uses_defaults_for_omitted_sections() {
        let config = SynthesisConfig::from_yaml_str(
            "road: { width_m: 7.0, length_m: 100.0, resolution_m: 0.1 }\n",
        )
        .unwrap();
        assert_eq!(config.tiers, TierTable::default());
        assert_eq!(config.feature_count, CountRange::new(15, 40));
        assert_eq!(config.margin, UVec2::new(5, 3));
        assert!(config.georeference.is_none());
        assert_eq!(config.road.length_axis, LengthAxis::Rows);
        assert!(config.clusters.is_empty());
    }

    #[test]
    fn clusters_must_be_non_empty_and_on_the_grid() {
        let road = RoadDimensions::new(7.0, 10.0, 0.1);
        let base = SynthesisConfig::new(road, TierTable::default(), CountRange::new(0, 0));
        let window = CellRegion::new(UVec2::new(10, 20), UVec2::new(30, 40));

        let ok = base
            .clone()
            .with_cluster(ClusterGroup::new(window, CountRange::new(3, 3), TierTable::default()));
        assert!(ok.validate().is_ok());

        let empty = CellRegion::new(UVec2::new(10, 20), UVec2::new(10, 40));
        let off_grid = CellRegion::new(UVec2::new(80, 20), UVec2::new(90, 40));
        for centers in [empty, off_grid] {
            let config = base.clone().with_cluster(ClusterGroup::new(
                centers,
                CountRange::new(3, 3),
                TierTable::default(),
            ));
            assert!(matches!(
                config.validate(),
                Err(SurfaceError::Configuration(_))
            ));
        }

        let flat = base.with_cluster(
            ClusterGroup::new(window, CountRange::new(3, 3), TierTable::default())
                .with_aspect(ValueRange::new(0.0, 1.0)),
        );
        assert!(matches!(
            flat.validate(),
            Err(SurfaceError::Configuration(_))
        ));
    }

    #[test]
    fn yaml_rejects_negative_dimensions() {
        let err = SynthesisConfig::from_yaml_str(
            "road: { width_m: -7.0, length_m: 100.0, resolution_m: 0.1 }\n",
        );
        assert!(matches!(err, Err(SurfaceError::Yaml(_))));
    }

    #[test]
    fn yaml_rejects_bad_tier_table() {
        let yaml = "\
road: { width_m: 7.0, length_m: 100.0, resolution_m: 0.1 }
tiers:
  - { severity: small, weight: 0.0, depth_cm: { min: 0.5, max: 2.5 }, radius_px: { min: 1.0, max: 3.0 } }
";
        assert!(matches!(
            SynthesisConfig::from_yaml_str(yaml),
            Err(SurfaceError::Yaml(_))
        ));
    }
}
