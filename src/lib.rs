//! Synthetic road-surface damage fields and their hazard rating.
//!
//! A [`FieldSynthesizer`] turns a road description and a severity tier table
//! into a depth grid (centimeters per pixel) by compositing noisy, rotated
//! elliptical pothole masks with a pointwise maximum. [`classify`] rates a
//! finished grid with an ordered threshold cascade.
//!
//! ```
//! use pothole_synth::{FieldSynthesizer, HazardThresholds, SynthesisConfig, classify};
//! use pothole_synth::types::DEFAULT_DAMAGE_EPSILON_CM;
//!
//! let synth = FieldSynthesizer::new(SynthesisConfig::default()).unwrap();
//! let field = synth.synthesize(42).unwrap();
//!
//! let thresholds = HazardThresholds::new(10.0, 0.007, 0.5).unwrap();
//! let report = classify(field.grid(), DEFAULT_DAMAGE_EPSILON_CM, &thresholds);
//! println!("{}: {}", report.rating, report.reason);
//! ```

pub mod grid;
pub mod hazard;
pub mod mask;
pub mod rng;
pub mod synthesis;
pub mod types;

pub use grid::{DepthGrid, Grid2d, LocalPatch, merge_max, merge_max_grid};
pub use hazard::{DamageStats, HazardRating, HazardReport, HazardThresholds, classify};
pub use mask::pothole_mask;
pub use rng::{RandomSource, SeededRng};
pub use synthesis::{DepthField, FieldSynthesizer, SynthesisConfig, TierTable};
pub use types::{CellRegion, DamageFeature, GeoReference, MapInfo, Severity, SurfaceError};
