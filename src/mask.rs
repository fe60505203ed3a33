//! Depth mask of a single damage feature.
//!
//! The mask is a rotated elliptical falloff `exp(-d / MASK_FALLOFF)` where `d`
//! is the normalised elliptical distance from the center, roughened with
//! multiplicative gaussian noise and cut off hard at `d > MASK_CUTOFF`.

use glam::{UVec2, Vec2};

use crate::grid::LocalPatch;
use crate::rng::RandomSource;
use crate::types::feature::validate_geometry;
use crate::types::{
    CellRegion, DamageFeature, MASK_CUTOFF, MASK_FALLOFF, MASK_NOISE_MEAN, MASK_NOISE_STD_DEV,
    MapInfo, SurfaceError,
};

/// Generate the depth mask for one feature.
///
/// * `shape` - patch size as (columns, rows)
/// * `center` - feature center inside the patch, x = column, y = row
/// * `radii` - column-axis (x) and row-axis (y) radius in pixels
/// * `rotation_deg` - rotation of the ellipse in degrees
/// * `max_depth` - depth at the center before noise, in centimeters
///
/// Returns a row-major array of `shape.x * shape.y` values, each in
/// `[0, max_depth]`. One noise value is drawn per pixel in row-major order.
/// A zero-area shape or a non-positive `max_depth` gives all zeros without
/// drawing from `rng`.
pub fn pothole_mask<R: RandomSource>(
    shape: UVec2,
    center: Vec2,
    radii: Vec2,
    rotation_deg: f32,
    max_depth: f32,
    rng: &mut R,
) -> Result<Vec<f32>, SurfaceError> {
    validate_geometry(center, radii, rotation_deg, max_depth)?;

    let len = (shape.x as usize) * (shape.y as usize);
    let mut mask = vec![0.0f32; len];
    if len == 0 || max_depth <= 0.0 {
        return Ok(mask);
    }

    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let inv_rx = 1.0 / radii.x;
    let inv_ry = 1.0 / radii.y;

    for row in 0..shape.y {
        let dr = row as f32 - center.y;
        for col in 0..shape.x {
            let dc = col as f32 - center.x;
            let noise = rng.normal_f32(MASK_NOISE_MEAN, MASK_NOISE_STD_DEV);

            let dr_rot = dr * cos - dc * sin;
            let dc_rot = dr * sin + dc * cos;
            let (u, v) = (dc_rot * inv_rx, dr_rot * inv_ry);
            let dist = u * u + v * v;
            if !(dist <= MASK_CUTOFF) {
                continue;
            }

            let depth = (-dist / MASK_FALLOFF).exp() * noise * max_depth;
            mask[(row as usize) * (shape.x as usize) + col as usize] = depth.clamp(0.0, max_depth);
        }
    }

    Ok(mask)
}

/// Build the clipped patch of `feature` on a grid described by `info`.
pub fn feature_patch<R: RandomSource>(
    feature: &DamageFeature,
    info: &MapInfo,
    rng: &mut R,
) -> Result<LocalPatch, SurfaceError> {
    let region: CellRegion = feature.footprint(info);
    let data = pothole_mask(
        region.size(),
        feature.local_center(&region),
        feature.radii,
        feature.rotation_deg,
        feature.max_depth,
        rng,
    )?;
    LocalPatch::new(region, data)
}
