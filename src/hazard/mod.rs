pub mod classify;
pub mod thresholds;

pub use classify::{DamageStats, HazardRating, HazardReport, classify, rate};
pub use thresholds::{DANGEROUS_DEPTH_MARGIN_CM, HazardThresholds, MAINTENANCE_DENSITY_FRACTION};
