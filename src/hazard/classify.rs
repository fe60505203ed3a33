//! Hazard rating of a finished depth grid.
//!
//! The rating is an ordered cascade over three statistics of the damaged
//! pixels (max depth, mean depth, density). Rules are tried in order and the
//! first match wins, so a grid meeting several rules gets the earliest one.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::DepthGrid;
use crate::hazard::HazardThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HazardRating {
    Good,
    MinorDamage,
    MaintenanceWarning,
    RoughnessWarning,
    Cautious,
    Dangerous,
    Hazardous,
}

impl HazardRating {
    /// Display title, e.g. for a heatmap.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::MinorDamage => "Decent (Minor Damage)",
            Self::MaintenanceWarning => "MAINTENANCE WARNING",
            Self::RoughnessWarning => "ROUGHNESS WARNING",
            Self::Cautious => "CAUTIOUS",
            Self::Dangerous => "DANGEROUS",
            Self::Hazardous => "HAZARDOUS",
        }
    }
}

impl fmt::Display for HazardRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics over the pixels deeper than the damage epsilon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DamageStats {
    pub max_depth: f32,
    pub mean_depth: f32,
    pub damaged_count: usize,
    pub total_count: usize,
    /// `damaged_count / total_count`.
    pub density: f32,
}

impl DamageStats {
    pub fn measure(grid: &DepthGrid, damage_epsilon: f32) -> Self {
        let total_count = grid.len();
        let mut damaged_count = 0usize;
        let mut max_depth = 0.0f32;
        let mut sum = 0.0f64;

        for &depth in grid.data() {
            if depth > damage_epsilon {
                damaged_count += 1;
                max_depth = max_depth.max(depth);
                sum += depth as f64;
            }
        }

        if damaged_count == 0 {
            return Self {
                total_count,
                ..Default::default()
            };
        }

        Self {
            max_depth,
            mean_depth: (sum / damaged_count as f64) as f32,
            damaged_count,
            total_count,
            density: (damaged_count as f64 / total_count as f64) as f32,
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.damaged_count > 0
    }

    /// Density expressed as damaged pixels per 10 000.
    pub fn density_per_10k(&self) -> f32 {
        self.density * 10_000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardReport {
    pub rating: HazardRating,
    pub reason: String,
    pub stats: DamageStats,
}

impl HazardReport {
    pub fn max_depth(&self) -> f32 {
        self.stats.max_depth
    }

    pub fn mean_depth(&self) -> f32 {
        self.stats.mean_depth
    }

    pub fn damaged_count(&self) -> usize {
        self.stats.damaged_count
    }
}

/// Rate a grid. Pixels deeper than `damage_epsilon` (cm) count as damaged.
///
/// A grid without damage rates [`HazardRating::Good`]; this never fails.
pub fn classify(
    grid: &DepthGrid,
    damage_epsilon: f32,
    thresholds: &HazardThresholds,
) -> HazardReport {
    let stats = DamageStats::measure(grid, damage_epsilon);
    let (rating, reason) = rate(&stats, thresholds);
    debug!(
        %rating,
        max_depth = stats.max_depth,
        mean_depth = stats.mean_depth,
        damaged = stats.damaged_count,
        density = stats.density,
        "classified damage field"
    );
    HazardReport {
        rating,
        reason,
        stats,
    }
}

/// The rating cascade. Order is significant: the first matching rule wins.
pub fn rate(stats: &DamageStats, t: &HazardThresholds) -> (HazardRating, String) {
    if !stats.is_damaged() {
        return (HazardRating::Good, "Road is perfectly smooth.".to_string());
    }

    let max = stats.max_depth;
    let mean = stats.mean_depth;
    let per_10k = stats.density_per_10k();

    if max >= t.max_depth_cm && stats.density >= t.max_density {
        (
            HazardRating::Hazardous,
            format!(
                "Critical severity and frequency: max depth ({max:.1} cm) and damage density \
                 ({per_10k:.1} per 10000 pixels) are both critical."
            ),
        )
    } else if max >= t.dangerous_depth_cm() {
        (
            HazardRating::Dangerous,
            format!("Extreme severity: single pothole max depth ({max:.1} cm) is a severe hazard."),
        )
    } else if stats.density >= t.max_density {
        (
            HazardRating::Cautious,
            format!("Critical frequency: damage density ({per_10k:.1} per 10000 pixels) is too high."),
        )
    } else if mean > t.max_mean_depth_cm {
        (
            HazardRating::RoughnessWarning,
            format!("Roughness warning: average damage depth is high ({mean:.1} cm), repair soon."),
        )
    } else if stats.density >= t.maintenance_density() {
        (
            HazardRating::MaintenanceWarning,
            format!(
                "Maintenance warning: damage density ({per_10k:.1} per 10000 pixels) is \
                 approaching the hazardous level."
            ),
        )
    } else {
        (
            HazardRating::MinorDamage,
            format!(
                "Minor surface defects (max depth {max:.1} cm, density {per_10k:.1} per 10000 \
                 pixels) but safe for regular use."
            ),
        )
    }
}
