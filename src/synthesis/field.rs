//! Damage field synthesis.
//!
//! Every feature owns two sub-streams of the root source: one for its
//! geometry and one for its mask noise. Feature counts come from a separate
//! layout stream. Because no draw is shared between features and merging is a
//! pointwise maximum, the finished grid depends only on the root seed and the
//! configuration, never on the order (or thread) features are rendered in.

use glam::{UVec2, Vec2};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::grid::{DepthGrid, LocalPatch, merge_max};
use crate::mask::feature_patch;
use crate::rng::{RandomSource, SeededRng};
use crate::synthesis::{CountRange, RoadDimensions, SynthesisConfig, TierTable, ValueRange};
use crate::types::{
    ASPECT_JITTER_MAX, ASPECT_JITTER_MIN, CellRegion, DEFAULT_DAMAGE_EPSILON_CM, DamageFeature,
    GeoReference, MapInfo, SurfaceError,
};

const LAYOUT_STREAM: u64 = 0;

#[inline]
fn geometry_stream(index: u32) -> u64 {
    1 + 2 * index as u64
}

#[inline]
fn noise_stream(index: u32) -> u64 {
    2 + 2 * index as u64
}

/// Synthesized grid plus everything needed to describe it downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthField {
    grid: DepthGrid,
    road: RoadDimensions,
    georeference: Option<GeoReference>,
    features: Vec<DamageFeature>,
    seed: Option<u64>,
}

impl DepthField {
    pub fn grid(&self) -> &DepthGrid {
        &self.grid
    }

    pub fn info(&self) -> &MapInfo {
        self.grid.info()
    }

    pub fn road(&self) -> &RoadDimensions {
        &self.road
    }

    pub fn georeference(&self) -> Option<&GeoReference> {
        self.georeference.as_ref()
    }

    /// Features composited into the grid, in index order.
    pub fn features(&self) -> &[DamageFeature] {
        &self.features
    }

    /// Root seed, when the field was synthesized from one.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Feature centers in world coordinates (meters).
    pub fn feature_positions_m(&self) -> Vec<Vec2> {
        self.features
            .iter()
            .map(|f| self.grid.map_to_world(&f.center))
            .collect()
    }

    /// Flat attribute set for persistence alongside the grid.
    pub fn attributes(&self) -> FieldAttributes {
        let info = self.grid.info();
        FieldAttributes {
            road_width_m: self.road.width_m,
            road_length_m: self.road.length_m,
            grid_resolution_m: info.resolution,
            rows: info.height,
            cols: info.width,
            start_lat: self.georeference.map(|g| g.origin_lat),
            start_lon: self.georeference.map(|g| g.origin_lon),
            cell_size_degree: self.georeference.map(|g| g.degrees_per_pixel),
            feature_count: self.features.len(),
            seed: self.seed,
        }
    }

    pub fn into_grid(self) -> DepthGrid {
        self.grid
    }
}

/// Attributes describing a [`DepthField`], named after what the array store expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FieldAttributes {
    pub road_width_m: f32,
    pub road_length_m: f32,
    pub grid_resolution_m: f32,
    pub rows: u32,
    pub cols: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_size_degree: Option<f64>,
    pub feature_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Inclusive range of center cells along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CenterSpan {
    first: u32,
    last: u32,
}

impl CenterSpan {
    /// Centers avoid `margin` cells at both ends; the margin shrinks on grids
    /// too small to hold it. `size` must be at least 1.
    fn new(size: u32, margin: u32) -> Self {
        let margin = margin.min((size - 1) / 2);
        Self {
            first: margin,
            last: size - 1 - margin,
        }
    }

    /// Cells `[min, max)` of a non-empty window.
    fn window(min: u32, max: u32) -> Self {
        Self {
            first: min,
            last: max - 1,
        }
    }
}

/// Where and how one population of features is drawn: the dispersed
/// population or a single cluster.
#[derive(Debug, Clone)]
struct Placement {
    rows: CenterSpan,
    cols: CenterSpan,
    count: CountRange,
    tiers: TierTable,
    aspect: ValueRange,
}

impl Placement {
    fn region(&self) -> CellRegion {
        CellRegion::new(
            UVec2::new(self.cols.first, self.rows.first),
            UVec2::new(self.cols.last + 1, self.rows.last + 1),
        )
    }

    fn sample<R: RandomSource>(&self, rng: &mut R) -> Result<DamageFeature, SurfaceError> {
        let row = rng.uniform_u32(self.rows.first, self.rows.last);
        let col = rng.uniform_u32(self.cols.first, self.cols.last);

        let tier = self.tiers.select(rng);
        let row_radius = tier.radius_px.sample(rng);
        let col_radius = row_radius * self.aspect.sample(rng);
        let rotation = rng.uniform_f32(0.0, 360.0);
        let max_depth = tier.depth_cm.sample(rng);

        let feature = DamageFeature::new(
            Vec2::new(col as f32, row as f32),
            Vec2::new(col_radius, row_radius),
            rotation,
            max_depth,
            tier.severity,
        )?;
        trace!(
            severity = ?feature.severity,
            row,
            col,
            row_radius,
            col_radius,
            max_depth,
            "sampled feature"
        );
        Ok(feature)
    }
}

/// Validated synthesis setup. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct FieldSynthesizer {
    config: SynthesisConfig,
    info: MapInfo,
    dispersed: Placement,
    clusters: Vec<Placement>,
}

impl FieldSynthesizer {
    /// Validate `config` and derive the grid shape. Fails before any work is done.
    pub fn new(config: SynthesisConfig) -> Result<Self, SurfaceError> {
        config.validate()?;
        let info = config.road.map_info()?;
        let rows = CenterSpan::new(info.height, config.margin.y);
        let cols = CenterSpan::new(info.width, config.margin.x);
        if rows.first < config.margin.y || cols.first < config.margin.x {
            warn!(
                rows = info.height,
                cols = info.width,
                margin_rows = config.margin.y,
                margin_cols = config.margin.x,
                "grid too small for interior margin, shrinking it"
            );
        }
        let dispersed = Placement {
            rows,
            cols,
            count: config.feature_count,
            tiers: config.tiers.clone(),
            aspect: ValueRange::new(ASPECT_JITTER_MIN, ASPECT_JITTER_MAX),
        };

        let clusters = config
            .clusters
            .iter()
            .map(|cluster| {
                let window = cluster.centers.clip_to(&info);
                if window != cluster.centers {
                    warn!(
                        requested = ?cluster.centers,
                        clipped = ?window,
                        "cluster window exceeds the grid, clipping it"
                    );
                }
                Placement {
                    rows: CenterSpan::window(window.min.y, window.max.y),
                    cols: CenterSpan::window(window.min.x, window.max.x),
                    count: cluster.count,
                    tiers: cluster.tiers.clone(),
                    aspect: cluster.aspect,
                }
            })
            .collect();

        Ok(Self {
            config,
            info,
            dispersed,
            clusters,
        })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Shape and resolution of every grid this synthesizer produces.
    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    /// Synthesize a grid from a root seed.
    pub fn synthesize(&self, seed: u64) -> Result<DepthField, SurfaceError> {
        let mut field = self.synthesize_with(&SeededRng::from_seed_u64(seed))?;
        field.seed = Some(seed);
        Ok(field)
    }

    /// Synthesize a grid, deriving every stream from `root`.
    pub fn synthesize_with<R>(&self, root: &R) -> Result<DepthField, SurfaceError>
    where
        R: RandomSource + Send + Sync,
    {
        let features = self.sample_features(root)?;
        debug!(
            rows = self.info.height,
            cols = self.info.width,
            features = features.len(),
            "synthesizing damage field"
        );

        let grid = self.composite(root, &features)?;

        debug!(
            damaged = grid
                .data()
                .iter()
                .filter(|&&v| v > DEFAULT_DAMAGE_EPSILON_CM)
                .count(),
            max_depth = grid.max_value(),
            "damage field complete"
        );

        Ok(DepthField {
            grid,
            road: self.config.road,
            georeference: self.config.georeference,
            features,
            seed: None,
        })
    }

    /// Draw the feature counts and the geometry of every feature.
    ///
    /// Dispersed features come first, then each cluster in configuration
    /// order. Feature indices run across all of them.
    pub fn sample_features<R: RandomSource>(
        &self,
        root: &R,
    ) -> Result<Vec<DamageFeature>, SurfaceError> {
        let mut layout = root.substream(LAYOUT_STREAM);
        let placements: Vec<(&Placement, u32)> = self
            .placements()
            .map(|p| (p, layout.uniform_u32(p.count.min, p.count.max)))
            .collect();

        let total: usize = placements.iter().map(|&(_, n)| n as usize).sum();
        let mut features = Vec::with_capacity(total);
        let mut index = 0u32;
        for (placement, count) in placements {
            for _ in 0..count {
                let mut rng = root.substream(geometry_stream(index));
                features.push(placement.sample(&mut rng)?);
                index += 1;
            }
        }
        Ok(features)
    }

    /// Draw one dispersed feature: interior center, weighted tier, radii,
    /// rotation and depth.
    pub fn sample_feature<R: RandomSource>(
        &self,
        rng: &mut R,
    ) -> Result<DamageFeature, SurfaceError> {
        self.dispersed.sample(rng)
    }

    /// Render the patch of feature `index`, drawing noise from its own stream.
    pub fn render_feature<R: RandomSource>(
        &self,
        root: &R,
        index: u32,
        feature: &DamageFeature,
    ) -> Result<LocalPatch, SurfaceError> {
        let mut rng = root.substream(noise_stream(index));
        feature_patch(feature, &self.info, &mut rng)
    }

    fn placements(&self) -> impl Iterator<Item = &Placement> {
        std::iter::once(&self.dispersed).chain(&self.clusters)
    }

    #[cfg(not(feature = "rayon"))]
    fn composite<R>(&self, root: &R, features: &[DamageFeature]) -> Result<DepthGrid, SurfaceError>
    where
        R: RandomSource + Send + Sync,
    {
        self.composite_sequential(root, features)
    }

    #[cfg(feature = "rayon")]
    fn composite<R>(&self, root: &R, features: &[DamageFeature]) -> Result<DepthGrid, SurfaceError>
    where
        R: RandomSource + Send + Sync,
    {
        self.composite_parallel(root, features)
    }

    #[cfg(any(not(feature = "rayon"), test))]
    fn composite_sequential<R: RandomSource>(
        &self,
        root: &R,
        features: &[DamageFeature],
    ) -> Result<DepthGrid, SurfaceError> {
        let mut grid = DepthGrid::zeros(self.info);
        for (index, feature) in features.iter().enumerate() {
            let patch = self.render_feature(root, index as u32, feature)?;
            merge_max(&mut grid, &patch);
        }
        Ok(grid)
    }

    /// Each rayon partition folds its patches into a private grid; partitions
    /// are then reduced with the same max-merge.
    #[cfg(feature = "rayon")]
    fn composite_parallel<R>(
        &self,
        root: &R,
        features: &[DamageFeature],
    ) -> Result<DepthGrid, SurfaceError>
    where
        R: RandomSource + Send + Sync,
    {
        use rayon::prelude::*;

        use crate::grid::merge_max_grid;

        let region = CellRegion::full(&self.info);
        features
            .par_iter()
            .enumerate()
            .try_fold(
                || DepthGrid::zeros(self.info),
                |mut grid, (index, feature)| {
                    let patch = self.render_feature(root, index as u32, feature)?;
                    merge_max(&mut grid, &patch);
                    Ok::<_, SurfaceError>(grid)
                },
            )
            .try_reduce(
                || DepthGrid::zeros(self.info),
                |mut acc, part| {
                    merge_max_grid(&mut acc, &part, region);
                    Ok(acc)
                },
            )
    }

    /// Interior window that dispersed feature centers are drawn from.
    pub fn center_region(&self) -> CellRegion {
        self.dispersed.region()
    }

    /// Center windows of the clusters, clipped to the grid, in configuration order.
    pub fn cluster_regions(&self) -> Vec<CellRegion> {
        self.clusters.iter().map(Placement::region).collect()
    }
}
