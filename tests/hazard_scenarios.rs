use glam::UVec2;

use pothole_synth::types::DEFAULT_DAMAGE_EPSILON_CM;
use pothole_synth::{
    DepthGrid, FieldSynthesizer, HazardRating, HazardThresholds, MapInfo, SynthesisConfig,
    classify,
};

fn thresholds() -> HazardThresholds {
    HazardThresholds::new(10.0, 0.007, 0.5).unwrap()
}

/// Grid with the first `count` cells (row-major) set to `depth`.
fn grid_with(width: u32, height: u32, count: u32, depth: f32) -> DepthGrid {
    let mut grid = DepthGrid::zeros(MapInfo::new(width, height, 0.1));
    for i in 0..count {
        grid.set(UVec2::new(i % width, i / width), depth).unwrap();
    }
    grid
}

#[test]
fn smooth_road_is_good() {
    let grid = DepthGrid::zeros(MapInfo::new(10, 10, 0.1));
    let report = classify(&grid, 0.5, &thresholds());

    assert_eq!(report.rating, HazardRating::Good);
    assert_eq!(report.reason, "Road is perfectly smooth.");
    assert_eq!(
        (report.max_depth(), report.mean_depth(), report.damaged_count()),
        (0.0, 0.0, 0)
    );
}

#[test]
fn single_deep_pothole_is_dangerous() {
    // One 9 cm pixel in 5000: density 0.0002.
    let grid = grid_with(50, 100, 1, 9.0);
    let report = classify(&grid, DEFAULT_DAMAGE_EPSILON_CM, &thresholds());

    assert!((report.stats.density - 0.0002).abs() < 1e-7);
    assert_eq!(report.rating, HazardRating::Dangerous);
    assert!(report.reason.contains("9.0 cm"), "{}", report.reason);
}

#[test]
fn dense_shallow_damage_is_cautious() {
    // 75 pixels at 3 cm in 10 000: density 0.0075.
    let grid = grid_with(100, 100, 75, 3.0);
    let report = classify(&grid, DEFAULT_DAMAGE_EPSILON_CM, &thresholds());

    assert_eq!(report.damaged_count(), 75);
    assert_eq!(report.max_depth(), 3.0);
    assert_eq!(report.rating, HazardRating::Cautious);
    assert!(report.reason.contains("75.0 per 10000"), "{}", report.reason);
}

#[test]
fn rough_sparse_damage_is_roughness_warning() {
    // 10 pixels at 0.6 cm in 10 000: density 0.001, mean 0.6.
    let grid = grid_with(100, 100, 10, 0.6);
    let report = classify(&grid, DEFAULT_DAMAGE_EPSILON_CM, &thresholds());

    assert!((report.mean_depth() - 0.6).abs() < 1e-6);
    assert_eq!(report.rating, HazardRating::RoughnessWarning);
    assert!(report.reason.contains("0.6 cm"), "{}", report.reason);
}

#[test]
fn deep_and_dense_damage_is_hazardous() {
    let grid = grid_with(100, 100, 80, 10.5);
    let report = classify(&grid, DEFAULT_DAMAGE_EPSILON_CM, &thresholds());
    assert_eq!(report.rating, HazardRating::Hazardous);
}

#[test]
fn near_limit_density_is_maintenance_warning() {
    // 60 shallow pixels: density 0.006 >= 0.75 * 0.007, mean below the limit.
    let grid = grid_with(100, 100, 60, 0.4);
    let report = classify(&grid, 0.1, &thresholds());
    assert_eq!(report.rating, HazardRating::MaintenanceWarning);
}

#[test]
fn epsilon_is_a_strict_lower_bound() {
    let grid = grid_with(10, 10, 20, 0.5);
    let report = classify(&grid, 0.5, &thresholds());
    assert_eq!(report.rating, HazardRating::Good);
}

#[test]
fn classification_does_not_touch_grid() {
    let field = FieldSynthesizer::new(SynthesisConfig::default())
        .unwrap()
        .synthesize(11)
        .unwrap();
    let before = field.grid().clone();
    let report = classify(field.grid(), DEFAULT_DAMAGE_EPSILON_CM, &thresholds());
    assert_eq!(field.grid(), &before);
    assert!(report.damaged_count() > 0);
    assert!(report.max_depth() <= 9.0);
    assert_eq!(report.stats.total_count, 70 * 1000);
}
