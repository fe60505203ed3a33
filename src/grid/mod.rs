pub mod grid2d;
pub mod merge;
pub mod patch;

pub use grid2d::Grid2d;
pub use merge::{merge_max, merge_max_grid};
pub use patch::LocalPatch;

/// Depth grid in centimeters.
pub type DepthGrid = Grid2d<f32>;
