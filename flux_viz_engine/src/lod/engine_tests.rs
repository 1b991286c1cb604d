use super::LodEngine;
use crate::lod::{LODLevel, LodConfig};
use crate::model::DataPoint;

fn series_of(n: usize) -> Vec<DataPoint> {
    (0..n).map(|i| DataPoint::new(i as f64, (i as f64).sin())).collect()
}

#[test]
fn scenario_fast_path_250_points_target_1000() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(250);
    let result = engine.downsample(&points, 1000, None);
    assert_eq!(result.sampled_points, 250);
    assert_eq!(result.level, LODLevel::Full);
    assert_eq!(result.compression_ratio(), 1.0);
}

#[test]
fn fast_path_excludes_non_finite_y_from_buckets() {
    let engine = LodEngine::new(LodConfig::default());
    let mut points = series_of(5);
    points.push(DataPoint::new(5.0, f64::NAN));
    points.push(DataPoint::new(6.0, f64::INFINITY));

    let result = engine.downsample(&points, 1000, None);

    assert_eq!(result.total_points, 7);
    assert_eq!(result.sampled_points, 5);
    assert!(result.buckets.iter().all(|b| b.min_y.is_finite() && b.max_y.is_finite() && b.avg_y.is_finite()));
}

#[test]
fn scenario_downsample_with_anomaly_is_preserved() {
    let engine = LodEngine::new(LodConfig::default());
    let mut points: Vec<DataPoint> = (0..10_000)
        .map(|i| DataPoint::new(i as f64, (i % 10) as f64))
        .collect();
    points.push(DataPoint::new(10_000.0, 1_000_000.0));

    let result = engine.downsample(&points, 100, None);
    let anomaly_found = result
        .buckets
        .iter()
        .any(|b| b.outliers.iter().any(|o| o.y == 1_000_000.0));
    assert!(anomaly_found, "anomalous point must survive into some bucket's outliers");
}

#[test]
fn empty_input_yields_empty_result() {
    let engine = LodEngine::new(LodConfig::default());
    let result = engine.downsample(&[], 100, None);
    assert_eq!(result.buckets.len(), 0);
    assert_eq!(result.level, LODLevel::Full);
}

#[test]
fn zero_target_yields_empty_result() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(10);
    let result = engine.downsample(&points, 0, None);
    assert_eq!(result.buckets.len(), 0);
}

#[test]
fn universal_lod_monotonicity_target_ge_len() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(50);
    let result = engine.downsample(&points, 200, None);
    assert_eq!(result.buckets.len(), 50);
    for (bucket, point) in result.buckets.iter().zip(points.iter()) {
        assert_eq!(bucket.representative, *point);
    }
}

#[test]
fn universal_lod_envelope_covers_global_min_max() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(5_000);
    let result = engine.downsample(&points, 20, None);

    let global_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let global_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let bucket_min = result.buckets.iter().map(|b| b.min_y).fold(f64::INFINITY, f64::min);
    let bucket_max = result.buckets.iter().map(|b| b.max_y).fold(f64::NEG_INFINITY, f64::max);

    assert!((bucket_min - global_min).abs() < 1e-9);
    assert!((bucket_max - global_max).abs() < 1e-9);
}

#[test]
fn universal_lod_determinism() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(3_000);
    let r1 = engine.downsample(&points, 50, None);
    let r2 = engine.downsample(&points, 50, None);
    assert_eq!(r1, r2);
}

#[test]
fn bucket_invariants_hold() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(2_000);
    let result = engine.downsample(&points, 30, None);
    for bucket in &result.buckets {
        assert!(bucket.t_start < bucket.t_end);
        assert!(bucket.min_y <= bucket.avg_y + 1e-9);
        assert!(bucket.avg_y <= bucket.max_y + 1e-9);
        assert!(bucket.count >= 1);
        assert!(bucket.representative.x.as_f64() >= bucket.t_start);
        assert!(bucket.representative.x.as_f64() < bucket.t_end || bucket.representative.id.as_deref().map(|s| s.starts_with("bucket-")).unwrap_or(false));
    }
}

#[test]
fn buckets_never_overlap_and_are_ascending() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(4_000);
    let result = engine.downsample(&points, 40, None);
    for w in result.buckets.windows(2) {
        assert!(w[0].t_end <= w[1].t_start);
        assert!(w[0].t_start < w[1].t_start);
    }
}

#[test]
fn zoom_refine_filters_to_window_and_doubles_target() {
    let engine = LodEngine::new(LodConfig::default());
    let points = series_of(1_000);
    let result = engine.zoom_refine(&points, 10, (100.0, 200.0));
    assert!(result.buckets.iter().all(|b| b.t_start >= 100.0 && b.t_end <= 200.01));
}
