//! Procedural damage field synthesis.

pub mod batch;
pub mod config;
pub mod field;
pub mod tiers;

pub use batch::Samples;
pub use config::{ClusterGroup, CountRange, LengthAxis, RoadDimensions, SynthesisConfig};
pub use field::{DepthField, FieldAttributes, FieldSynthesizer};
pub use tiers::{TierSpec, TierTable, ValueRange};
