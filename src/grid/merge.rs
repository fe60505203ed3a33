//! Pointwise-maximum compositing of depth contributions.
//!
//! Max-merge is commutative, associative and idempotent with identity 0, so
//! patches can be merged in any order (or twice) and yield the same grid.
//! Non-finite and negative source values never win against a valid depth.

use crate::grid::{DepthGrid, LocalPatch};
use crate::types::CellRegion;

/// Merges a patch into the grid at the patch's offset, taking the maximum depth.
///
/// The patch region is clipped to the grid; cells falling outside are ignored.
pub fn merge_max(master: &mut DepthGrid, patch: &LocalPatch) {
    let region = *patch.region();
    let clipped = region.clip_to(master.info());
    if clipped.is_empty() {
        return;
    }

    // A non-empty clip never moves `min`, so patch rows start at column 0.
    let width = clipped.width() as usize;
    for y in clipped.min.y..clipped.max.y {
        let src = &patch.row(y - region.min.y)[..width];
        let dst = master.row_span_mut(y, clipped.min.x, clipped.max.x);
        max_into(dst, src);
    }
}

/// Merges `source` into `master` over `region` by taking the maximum depth.
///
/// **Assumption:** both grids share the same dimensions. The region is clipped
/// to the smaller of the two.
pub fn merge_max_grid(master: &mut DepthGrid, source: &DepthGrid, region: CellRegion) {
    let clipped = region.clip_to(master.info()).clip_to(source.info());
    if clipped.is_empty() {
        return;
    }

    for y in clipped.min.y..clipped.max.y {
        let src = source.row_span(y, clipped.min.x, clipped.max.x);
        let dst = master.row_span_mut(y, clipped.min.x, clipped.max.x);
        max_into(dst, src);
    }
}

#[inline]
fn max_into(dst: &mut [f32], src: &[f32]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        if s > *d {
            *d = s;
        }
    }
}
