use super::{PerfPolicy, TierEngine};
use crate::perf::FrameMetric;
use crate::surface::{RecordingMockSurface, Surface, Tier};
use crate::tier::ThresholdConfig;

fn engine_with_all_tiers() -> TierEngine {
    let mut engine = TierEngine::new(ThresholdConfig::default(), PerfPolicy::default());
    engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector))).unwrap();
    engine.register_surface(Tier::Raster, Box::new(RecordingMockSurface::new(Tier::Raster))).unwrap();
    engine.register_surface(Tier::Accelerated, Box::new(RecordingMockSurface::new(Tier::Accelerated))).unwrap();
    engine
}

#[test]
fn scenario_tier_selection_default_thresholds() {
    let mut e1 = engine_with_all_tiers();
    assert_eq!(e1.evaluate(4_999, 0.0, None).unwrap(), Tier::Vector);

    let mut e2 = engine_with_all_tiers();
    assert_eq!(e2.evaluate(5_001, 0.0, None).unwrap(), Tier::Raster);

    let mut e3 = engine_with_all_tiers();
    assert_eq!(e3.evaluate(50_001, 0.0, None).unwrap(), Tier::Accelerated);
}

#[test]
fn scenario_auto_degrade_after_threshold_violations() {
    let perf = PerfPolicy { degrade_frame_threshold: 3, ..PerfPolicy::default() };
    let mut engine = TierEngine::new(ThresholdConfig::default(), perf);
    engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector))).unwrap();
    engine.register_surface(Tier::Raster, Box::new(RecordingMockSurface::new(Tier::Raster))).unwrap();
    engine.register_surface(Tier::Accelerated, Box::new(RecordingMockSurface::new(Tier::Accelerated))).unwrap();

    engine.evaluate(60_000, 0.0, None).unwrap();
    assert_eq!(engine.current_tier(), Some(Tier::Accelerated));

    let observed = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let obs = observed.clone();
    engine.subscribe(Box::new(move |event| obs.borrow_mut().push(event.clone())));

    for i in 0..3 {
        engine.record_frame(FrameMetric::new(i, 50.0, 60_000, Tier::Accelerated, 33.33));
    }

    assert_eq!(engine.current_tier(), Some(Tier::Raster));
    let saw_performance_switch = observed.borrow().iter().any(|e| {
        matches!(e, crate::tier::EngineEvent::TierSwitch { reason: crate::tier::TierSwitchReason::Performance, to: Tier::Raster, .. })
    });
    assert!(saw_performance_switch);
}

#[test]
fn universal_tier_ordering_monotonic_with_point_count() {
    let counts = [100usize, 6_000, 60_000];
    let mut last = Tier::Vector;
    for &count in &counts {
        let mut engine = engine_with_all_tiers();
        let tier = engine.evaluate(count, 0.0, None).unwrap();
        assert!(tier >= last);
        last = tier;
    }
}

#[test]
fn fallback_walks_down_when_preferred_tier_unavailable() {
    let mut engine = TierEngine::new(ThresholdConfig::default(), PerfPolicy::default());
    engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector))).unwrap();
    // Accelerated and Raster are not registered.
    let tier = engine.evaluate(60_000, 0.0, None).unwrap();
    assert_eq!(tier, Tier::Vector);
}

#[test]
fn no_surfaces_registered_is_fatal() {
    let mut engine = TierEngine::new(ThresholdConfig::default(), PerfPolicy::default());
    let result = engine.evaluate(10, 0.0, None);
    assert!(result.is_err());
}

#[test]
fn force_tier_overrides_when_available() {
    let mut engine = engine_with_all_tiers();
    let tier = engine.evaluate(10, 0.0, Some(Tier::Accelerated)).unwrap();
    assert_eq!(tier, Tier::Accelerated);
}

#[test]
fn double_registration_for_same_tier_is_an_error() {
    let mut engine = TierEngine::new(ThresholdConfig::default(), PerfPolicy::default());
    engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector))).unwrap();
    let result = engine.register_surface(Tier::Vector, Box::new(RecordingMockSurface::new(Tier::Vector)));
    assert!(result.is_err());
}

#[test]
fn surface_mut_returns_the_registered_surface() {
    let mut engine = engine_with_all_tiers();
    assert!(engine.surface_mut(Tier::Vector).is_some());
}

#[test]
fn destroy_all_empties_surfaces_and_resets_current_tier() {
    let mut engine = engine_with_all_tiers();
    engine.evaluate(10, 0.0, None).unwrap();
    assert!(engine.current_tier().is_some());

    engine.destroy_all();

    assert!(engine.current_tier().is_none());
    assert!(engine.evaluate(10, 0.0, None).is_err());
}

#[test]
fn subscriber_count_tracks_registrations() {
    let mut engine = engine_with_all_tiers();
    assert_eq!(engine.subscriber_count(), 0);
    let key = engine.subscribe(Box::new(|_| {}));
    assert_eq!(engine.subscriber_count(), 1);
    engine.unsubscribe(key);
    assert_eq!(engine.subscriber_count(), 0);
}
