pub mod constants;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod info;

pub use constants::*;
pub use error::SurfaceError;
pub use feature::{DamageFeature, Severity};
pub use geometry::CellRegion;
pub use info::{GeoReference, MapInfo};
