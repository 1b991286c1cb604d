use super::*;
use crate::model::{DataPoint, IdentityScale, Margins, Series, Viewport};
use crate::surface::RecordingMockSurface;

fn engine_with_all_tiers(config: EngineConfig) -> VizEngine {
    let mut engine = VizEngine::new(config);
    engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector))).unwrap();
    engine.register_surface(Tier::Raster, Box::new(RecordingMockSurface::new(Tier::Raster))).unwrap();
    engine.register_surface(Tier::Accelerated, Box::new(RecordingMockSurface::new(Tier::Accelerated))).unwrap();
    engine
}

fn identity_viewport<'a>(x_scale: &'a IdentityScale, y_scale: &'a IdentityScale) -> Viewport<'a> {
    Viewport::new(400, 400, Margins::default(), x_scale, y_scale)
}

#[test]
fn engine_config_default_matches_documented_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.thresholds.vec_to_ras, 5_000);
    assert_eq!(config.thresholds.ras_to_accel, 50_000);
    assert!((config.target_frame_time_ms - 16.67).abs() < 1e-9);
    assert!((config.max_frame_time_ms - 33.33).abs() < 1e-9);
    assert!(config.auto_degrade);
    assert_eq!(config.degrade_frame_threshold, 10);
}

#[test]
fn render_selects_vector_tier_for_a_small_series() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0), DataPoint::new(1.0, 2.0)])];

    let output = engine.render(&series, &viewport, 1000, 0).unwrap();
    assert_eq!(output.tier, Tier::Vector);
    assert_eq!(output.lod.sampled_points, 2);
}

#[test]
fn render_without_any_surface_is_fatal() {
    let mut engine = VizEngine::new(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0)])];

    assert!(engine.render(&series, &viewport, 1000, 0).is_err());
}

#[test]
fn click_after_render_selects_the_indexed_point() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(5.0, 5.0)])];

    engine.render(&series, &viewport, 1000, 0).unwrap();
    let events = engine.click(5.0, 5.0, 0);

    assert_eq!(events, vec![crate::interaction::InteractionEvent::SelectionChanged(vec![("s1".to_string(), 0)])]);
    assert_eq!(engine.selection().selection.len(), 1);
}

#[test]
fn click_after_render_accounts_for_nonzero_viewport_margins() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let margins = Margins { top: 10, right: 0, bottom: 0, left: 20 };
    let viewport = Viewport::new(400, 400, margins, &x_scale, &y_scale);
    // Under the identity scale, `to_px(5) == 5`: the index stores this
    // point at inner-area pixel (5 - 20, 5 - 10). A click reported at the
    // same (5, 5) full-viewport pixel only lands on it if the click path
    // subtracts the same margins before querying the index.
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(5.0, 5.0)])];

    engine.render(&series, &viewport, 1000, 0).unwrap();
    let events = engine.click(5.0, 5.0, 0);

    assert_eq!(events, vec![crate::interaction::InteractionEvent::SelectionChanged(vec![("s1".to_string(), 0)])]);
    assert_eq!(engine.selection().selection.len(), 1);
}

#[test]
fn selection_persists_across_a_tier_transition() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);

    let small = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(5.0, 5.0)])];
    engine.render(&small, &viewport, 1000, 0).unwrap();
    engine.click(5.0, 5.0, 0);
    assert_eq!(engine.selection().selection.len(), 1);
    let before = engine.selection().selection.clone();

    let large: Vec<DataPoint> = (0..60_000).map(|i| DataPoint::new(i as f64, 1.0)).collect();
    let large_series = vec![Series::new("s1", "Series 1").with_data(large)];
    let output = engine.render(&large_series, &viewport, 1000, 1).unwrap();

    assert_eq!(output.tier, Tier::Accelerated);
    assert_eq!(engine.selection().selection, before);
}

#[test]
fn apply_threshold_override_merges_onto_the_current_config() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    engine.apply_threshold_override(ThresholdOverride {
        vec_to_ras: Some(100),
        ras_to_accel: None,
        ppp_vec: None,
        ppp_ras: None,
        ppp_accel: None,
    });

    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0); 150])];
    let output = engine.render(&series, &viewport, 1000, 0).unwrap();
    assert_eq!(output.tier, Tier::Raster);
}

#[test]
fn apply_tier_signal_forces_the_requested_tier() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    engine.apply_tier_signal(TierSignal { tier: Tier::Accelerated });

    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0)])];
    let output = engine.render(&series, &viewport, 1000, 0).unwrap();
    assert_eq!(output.tier, Tier::Accelerated);
}

#[test]
fn accessibility_summary_reports_per_series_stats() {
    let engine = VizEngine::new(EngineConfig::default());
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0), DataPoint::new(1.0, 3.0)])];
    let summary = engine.accessibility_summary(&series);
    assert_eq!(summary.per_series.len(), 1);
    assert_eq!(summary.per_series[0].mean, 2.0);
}

#[test]
fn shutdown_destroys_every_surface_and_clears_current_tier() {
    let mut engine = engine_with_all_tiers(EngineConfig::default());
    let x_scale = IdentityScale;
    let y_scale = IdentityScale;
    let viewport = identity_viewport(&x_scale, &y_scale);
    let series = vec![Series::new("s1", "Series 1").with_data(vec![DataPoint::new(0.0, 1.0)])];
    engine.render(&series, &viewport, 1000, 0).unwrap();
    assert!(engine.current_tier().is_some());

    engine.shutdown();

    assert!(engine.current_tier().is_none());
}
