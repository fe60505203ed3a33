//! Hazard thresholds. No `Default` is provided; callers pass explicit values.

use serde::{Deserialize, Serialize};

use crate::types::SurfaceError;

/// Offset below `max_depth_cm` at which a single deep feature is dangerous.
pub const DANGEROUS_DEPTH_MARGIN_CM: f32 = 2.0;
/// Fraction of `max_density` at which maintenance is flagged.
pub const MAINTENANCE_DENSITY_FRACTION: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct HazardThresholds {
    /// Maximum tolerable depth (cm).
    pub max_depth_cm: f32,
    /// Maximum tolerable fraction of damaged pixels.
    pub max_density: f32,
    /// Maximum tolerable mean depth of damaged pixels (cm).
    pub max_mean_depth_cm: f32,
}

impl HazardThresholds {
    pub fn new(
        max_depth_cm: f32,
        max_density: f32,
        max_mean_depth_cm: f32,
    ) -> Result<Self, SurfaceError> {
        let thresholds = Self {
            max_depth_cm,
            max_density,
            max_mean_depth_cm,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        for (name, value) in [
            ("max depth", self.max_depth_cm),
            ("max density", self.max_density),
            ("max mean depth", self.max_mean_depth_cm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SurfaceError::Configuration(format!(
                    "{name} threshold must be positive and finite, got {value}"
                )));
            }
        }
        if self.max_density > 1.0 {
            return Err(SurfaceError::Configuration(format!(
                "max density is a fraction of pixels, got {}",
                self.max_density
            )));
        }
        Ok(())
    }

    /// Depth at or above which a single feature rates `Dangerous`.
    pub fn dangerous_depth_cm(&self) -> f32 {
        self.max_depth_cm - DANGEROUS_DEPTH_MARGIN_CM
    }

    /// Density at or above which maintenance is flagged.
    pub fn maintenance_density(&self) -> f32 {
        self.max_density * MAINTENANCE_DENSITY_FRACTION
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SurfaceError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[derive(Deserialize)]
struct RawThresholds {
    max_depth_cm: f32,
    max_density: f32,
    max_mean_depth_cm: f32,
}

impl TryFrom<RawThresholds> for HazardThresholds {
    type Error = SurfaceError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.max_depth_cm, raw.max_density, raw.max_mean_depth_cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_thresholds() {
        let t = HazardThresholds::new(10.0, 0.008, 0.5).unwrap();
        assert_eq!(t.dangerous_depth_cm(), 8.0);
        assert!((t.maintenance_density() - 0.006).abs() < 1e-7);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        for (d, dens, mean) in [
            (0.0, 0.007, 0.5),
            (10.0, -0.1, 0.5),
            (10.0, 0.007, f32::NAN),
            (10.0, 1.5, 0.5),
        ] {
            assert!(matches!(
                HazardThresholds::new(d, dens, mean),
                Err(SurfaceError::Configuration(_))
            ));
        }
    }

    #[test]
    fn yaml_round_trip_validates() {
        let t = HazardThresholds::from_yaml_str(
            "max_depth_cm: 10.0\nmax_density: 0.007\nmax_mean_depth_cm: 0.5\n",
        )
        .unwrap();
        assert_eq!(t, HazardThresholds::new(10.0, 0.007, 0.5).unwrap());

        let missing = HazardThresholds::from_yaml_str("max_depth_cm: 10.0\n");
        assert!(matches!(missing, Err(SurfaceError::Yaml(_))));
        let negative = HazardThresholds::from_yaml_str(
            "max_depth_cm: -1.0\nmax_density: 0.007\nmax_mean_depth_cm: 0.5\n",
        );
        assert!(matches!(negative, Err(SurfaceError::Yaml(_))));
    }
}
