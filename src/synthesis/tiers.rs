//! Severity tiers: selection weight plus depth and radius ranges per tier.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::types::{Severity, SurfaceError};

/// Closed value range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Uniform draw from the range.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> f32 {
        rng.uniform_f32(self.min, self.max)
    }

    pub(crate) fn validate(&self, what: &str) -> Result<(), SurfaceError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SurfaceError::Configuration(format!(
                "{what} range must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(SurfaceError::Configuration(format!(
                "{what} range is malformed: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    pub severity: Severity,
    /// Relative selection weight; need not sum to one across tiers.
    pub weight: f32,
    /// Maximum depth of a feature in centimeters.
    pub depth_cm: ValueRange,
    /// Row-axis radius in pixels.
    pub radius_px: ValueRange,
}

impl TierSpec {
    fn validate(&self) -> Result<(), SurfaceError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(SurfaceError::Configuration(format!(
                "{:?} tier weight must be finite and non-negative, got {}",
                self.severity, self.weight
            )));
        }
        self.depth_cm.validate("depth")?;
        self.radius_px.validate("radius")?;
        if self.depth_cm.min < 0.0 {
            return Err(SurfaceError::Configuration(format!(
                "{:?} tier depth must be non-negative, got {}",
                self.severity, self.depth_cm.min
            )));
        }
        if !(self.radius_px.min > 0.0 && self.radius_px.min.recip().is_finite()) {
            return Err(SurfaceError::Configuration(format!(
                "{:?} tier radius must be positive, got {}",
                self.severity, self.radius_px.min
            )));
        }
        Ok(())
    }
}

/// Ordered list of tiers. Weighted selection walks the tiers in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierSpec>", into = "Vec<TierSpec>")]
pub struct TierTable {
    tiers: Vec<TierSpec>,
    total_weight: f32,
}

impl Default for TierTable {
    /// Dispersed damage: mostly small and medium potholes, one in five large.
    fn default() -> Self {
        let tiers = vec![
            TierSpec {
                severity: Severity::Large,
                weight: 0.2,
                depth_cm: ValueRange::new(5.0, 9.0),
                radius_px: ValueRange::new(5.0, 10.0),
            },
            TierSpec {
                severity: Severity::Medium,
                weight: 0.4,
                depth_cm: ValueRange::new(2.5, 5.0),
                radius_px: ValueRange::new(3.0, 5.0),
            },
            TierSpec {
                severity: Severity::Small,
                weight: 0.4,
                depth_cm: ValueRange::new(0.5, 2.5),
                radius_px: ValueRange::new(1.0, 3.0),
            },
        ];
        Self {
            total_weight: tiers.iter().map(|t| t.weight).sum(),
            tiers,
        }
    }
}

impl TierTable {
    pub fn new(tiers: Vec<TierSpec>) -> Result<Self, SurfaceError> {
        if tiers.is_empty() {
            return Err(SurfaceError::Configuration(
                "tier table must not be empty".to_string(),
            ));
        }
        for tier in &tiers {
            tier.validate()?;
        }
        let total_weight: f32 = tiers.iter().map(|t| t.weight).sum();
        if !(total_weight > 0.0 && total_weight.is_finite()) {
            return Err(SurfaceError::Configuration(format!(
                "tier weights must sum to a positive value, got {total_weight}"
            )));
        }
        Ok(Self {
            tiers,
            total_weight,
        })
    }

    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// Pick a tier with probability proportional to its weight.
    pub fn select<R: RandomSource>(&self, rng: &mut R) -> &TierSpec {
        let roll = rng.uniform_f32(0.0, self.total_weight);
        self.pick(roll)
    }

    /// Tier owning `roll` on the cumulative weight line `[0, total_weight)`.
    fn pick(&self, roll: f32) -> &TierSpec {
        let mut cumulative = 0.0;
        for tier in &self.tiers {
            cumulative += tier.weight;
            if roll < cumulative {
                return tier;
            }
        }
        // Rounding can leave `roll` just past the last boundary.
        self.tiers
            .iter()
            .rev()
            .find(|t| t.weight > 0.0)
            .unwrap_or(&self.tiers[self.tiers.len() - 1])
    }
}

impl TryFrom<Vec<TierSpec>> for TierTable {
    type Error = SurfaceError;

    fn try_from(tiers: Vec<TierSpec>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<TierSpec> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    fn tier(severity: Severity, weight: f32) -> TierSpec {
        TierSpec {
            severity,
            weight,
            depth_cm: ValueRange::new(1.0, 2.0),
            radius_px: ValueRange::new(1.0, 2.0),
        }
    }

    #[test]
    fn default_table_is_valid() {
        let table = TierTable::default();
        assert!(TierTable::new(table.tiers().to_vec()).is_ok());
        assert!((table.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pick_walks_cumulative_weights() {
        let table = TierTable::new(vec![
            tier(Severity::Large, 1.0),
            tier(Severity::Medium, 0.0),
            tier(Severity::Small, 3.0),
        ])
        .unwrap();
        assert_eq!(table.pick(0.0).severity, Severity::Large);
        assert_eq!(table.pick(0.99).severity, Severity::Large);
        assert_eq!(table.pick(1.0).severity, Severity::Small);
        assert_eq!(table.pick(3.99).severity, Severity::Small);
        assert_eq!(table.pick(4.0).severity, Severity::Small);
    }

    #[test]
    fn zero_weight_tier_is_never_selected() {
        let table = TierTable::new(vec![
            tier(Severity::Large, 0.0),
            tier(Severity::Small, 1.0),
            tier(Severity::Medium, 0.0),
        ])
        .unwrap();
        let mut rng = SeededRng::from_seed_u64(8);
        for _ in 0..500 {
            assert_eq!(table.select(&mut rng).severity, Severity::Small);
        }
    }

    #[test]
    fn selection_follows_weights() {
        let table = TierTable::default();
        let mut rng = SeededRng::from_seed_u64(31);
        let n = 10_000;
        let large = (0..n)
            .filter(|_| table.select(&mut rng).severity == Severity::Large)
            .count();
        let share = large as f32 / n as f32;
        assert!((share - 0.2).abs() < 0.03, "large share was {share}");
    }

    #[test]
    fn invalid_tables_are_configuration_errors() {
        assert!(matches!(
            TierTable::new(vec![]),
            Err(SurfaceError::Configuration(_))
        ));
        assert!(matches!(
            TierTable::new(vec![tier(Severity::Small, 0.0)]),
            Err(SurfaceError::Configuration(_))
        ));
        assert!(matches!(
            TierTable::new(vec![tier(Severity::Small, -1.0)]),
            Err(SurfaceError::Configuration(_))
        ));

        let mut malformed = tier(Severity::Small, 1.0);
        malformed.depth_cm = ValueRange::new(3.0, 1.0);
        assert!(matches!(
            TierTable::new(vec![malformed]),
            Err(SurfaceError::Configuration(_))
        ));

        let mut flat = tier(Severity::Small, 1.0);
        flat.radius_px = ValueRange::new(0.0, 1.0);
        assert!(matches!(
            TierTable::new(vec![flat]),
            Err(SurfaceError::Configuration(_))
        ));

        let mut subnormal = tier(Severity::Small, 1.0);
        subnormal.radius_px = ValueRange::new(1e-40, 1.0);
        assert!(matches!(
            TierTable::new(vec![subnormal]),
            Err(SurfaceError::Configuration(_))
        ));
    }
}
