//! The `VizEngine` facade: composes the tier engine, LOD engine, spatial
//! index, interaction coordinator and accessibility summariser behind a
//! single per-frame entry point.

use serde::{Deserialize, Serialize};

use crate::accessibility::{self, Summary};
use crate::error::Result;
use crate::interaction::{InteractionConfig, InteractionCoordinator, InteractionEvent};
use crate::lod::{LODResult, LodConfig, LodEngine};
use crate::model::{Real, Series, Viewport};
use crate::perf::FrameMetric;
use crate::spatial::{GridSpatialIndex, SpatialIndex};
use crate::surface::{Surface, Tier};
use crate::tier::{DeviceClass, EngineEvent, SubscriberKey, TierEngine, ThresholdConfig};

/// Reduced-motion preference from the `a11y` External Interfaces option
/// group; `Auto` defers to whatever the host reports via `reduced_motion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReducedMotion {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rendering hints from the `a11y` option group. The core never acts on
/// these directly (no concrete draw commands are part of this crate); a
/// `Surface` implementation reads them to decide how to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessibilityConfig {
    pub reduced_motion: ReducedMotion,
    pub high_contrast: bool,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self { reduced_motion: ReducedMotion::default(), high_contrast: false }
    }
}

/// The full set of tunable engine options, grouped by the subsystem they
/// configure. `EngineConfig::default()` reproduces every documented
/// default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub thresholds: ThresholdConfig,
    pub auto_detect: bool,
    pub lod: LodConfig,
    pub interaction: InteractionConfig,
    pub a11y: AccessibilityConfig,
    pub target_frame_time_ms: Real,
    pub max_frame_time_ms: Real,
    pub auto_degrade: bool,
    pub degrade_frame_threshold: usize,
    pub hit_radius: Real,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            auto_detect: false,
            lod: LodConfig::default(),
            interaction: InteractionConfig::default(),
            a11y: AccessibilityConfig::default(),
            target_frame_time_ms: 16.67,
            max_frame_time_ms: 33.33,
            auto_degrade: true,
            degrade_frame_threshold: 10,
            hit_radius: 10.0,
        }
    }
}

/// A runtime tier override delivered through a session signal, e.g.
/// `{"tier": "raster"}`. Round-tripped by the host application; the core
/// performs no I/O of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSignal {
    pub tier: Tier,
}

/// The `"hybrid-renderer-thresholds"` persisted blob: a threshold override
/// a host application can round-trip through its own storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    pub vec_to_ras: Option<u64>,
    pub ras_to_accel: Option<u64>,
    pub ppp_vec: Option<Real>,
    pub ppp_ras: Option<Real>,
    pub ppp_accel: Option<Real>,
}

impl ThresholdOverride {
    /// Apply this override onto `base`, leaving unset fields untouched.
    pub fn apply(&self, base: ThresholdConfig) -> ThresholdConfig {
        ThresholdConfig {
            vec_to_ras: self.vec_to_ras.unwrap_or(base.vec_to_ras),
            ras_to_accel: self.ras_to_accel.unwrap_or(base.ras_to_accel),
            ppp_vec: self.ppp_vec.unwrap_or(base.ppp_vec),
            ppp_ras: self.ppp_ras.unwrap_or(base.ppp_ras),
            ppp_accel: self.ppp_accel.unwrap_or(base.ppp_accel),
            force_tier: base.force_tier,
        }
    }
}

/// The engine's per-frame output: the tier rendered on, the downsampled
/// view handed to that tier's surface, and any events raised along the way.
pub struct FrameOutput {
    pub tier: Tier,
    pub lod: LODResult,
    pub events: Vec<InteractionEvent>,
}

/// Top-level facade wiring the tier engine, LOD engine, spatial index and
/// interaction coordinator into one per-frame entry point. One instance
/// per view; never a global.
pub struct VizEngine {
    config: EngineConfig,
    tier_engine: TierEngine,
    lod_engine: LodEngine,
    index: GridSpatialIndex,
    coordinator: InteractionCoordinator,
}

impl VizEngine {
    pub fn new(mut config: EngineConfig) -> Self {
        if config.auto_detect {
            let class = DeviceClass::detect(num_cpus_hint(), available_memory_hint(), false);
            config.thresholds = ThresholdConfig::for_device_class(class);
        }

        let perf = crate::tier::PerfPolicy {
            target_frame_time_ms: config.target_frame_time_ms,
            max_frame_time_ms: config.max_frame_time_ms,
            auto_degrade: config.auto_degrade,
            degrade_frame_threshold: config.degrade_frame_threshold,
        };

        Self {
            tier_engine: TierEngine::new(config.thresholds, perf),
            lod_engine: LodEngine::new(config.lod),
            index: GridSpatialIndex::new(config.hit_radius),
            coordinator: InteractionCoordinator::new(config.interaction),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn register_surface(&mut self, tier: Tier, surface: Box<dyn Surface>) -> Result<()> {
        self.tier_engine.register_surface(tier, surface)
    }

    pub fn subscribe(&mut self, handler: Box<dyn FnMut(&EngineEvent)>) -> SubscriberKey {
        self.tier_engine.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, key: SubscriberKey) -> bool {
        self.tier_engine.unsubscribe(key)
    }

    pub fn current_tier(&self) -> Option<Tier> {
        self.tier_engine.current_tier()
    }

    pub fn selection(&self) -> &crate::interaction::SelectionState {
        self.coordinator.selection()
    }

    /// Apply a persisted threshold override on top of the current
    /// configuration.
    pub fn apply_threshold_override(&mut self, override_: ThresholdOverride) {
        let merged = override_.apply(*self.tier_engine.thresholds());
        self.tier_engine.set_thresholds(merged);
    }

    /// Apply a runtime tier signal; honoured only if the corresponding
    /// surface is registered.
    pub fn apply_tier_signal(&mut self, signal: TierSignal) {
        let mut thresholds = *self.tier_engine.thresholds();
        thresholds.force_tier = Some(signal.tier);
        self.tier_engine.set_thresholds(thresholds);
    }

    /// Clear a previously-applied runtime tier signal, returning to
    /// density-based auto-selection.
    pub fn clear_tier_signal(&mut self) {
        let mut thresholds = *self.tier_engine.thresholds();
        thresholds.force_tier = None;
        self.tier_engine.set_thresholds(thresholds);
    }

    /// Run one full render cycle: select a tier, downsample, render on
    /// the chosen surface, record the frame, and rebuild the spatial
    /// index. Attaching the coordinator to a newly-selected surface
    /// preserves the selection set but drops hover and pending timers.
    pub fn render(
        &mut self,
        series_set: &[Series],
        viewport: &Viewport<'_>,
        target_points: usize,
        now_ms: i64,
    ) -> Result<FrameOutput> {
        self.coordinator.set_margins(viewport.margins);

        let total_points: usize = series_set.iter().map(|s| s.len()).sum();
        let points_per_pixel = if viewport.inner_width() > 0.0 {
            total_points as Real / viewport.inner_width()
        } else {
            0.0
        };

        let previous_tier = self.tier_engine.current_tier();
        let force_tier = self.tier_engine.thresholds().force_tier;
        let tier = self.tier_engine.evaluate(total_points, points_per_pixel, force_tier)?;
        if previous_tier != Some(tier) {
            self.coordinator.attach();
        }

        let mut lod = LODResult::empty();
        for series in series_set {
            if !series.visible {
                continue;
            }
            let downsampled = self.lod_engine.downsample(&series.data, target_points, None);
            lod.buckets.extend(downsampled.buckets);
            lod.total_points += downsampled.total_points;
            lod.sampled_points += downsampled.sampled_points;
            lod.outlier_count += downsampled.outlier_count;
        }
        lod.level = crate::lod::LODLevel::from_compression_ratio(lod.compression_ratio());

        let start = std::time::Instant::now();
        let surface = self
            .tier_engine
            .surface_mut(tier)
            .ok_or_else(|| crate::flux_err!(Fatal, "flux::viz_engine", "selected tier {:?} has no surface", tier))?;
        surface.render(series_set, viewport)?;
        let frame_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.tier_engine.record_frame(FrameMetric::new(
            now_ms,
            frame_time_ms,
            total_points,
            tier,
            self.config.max_frame_time_ms,
        ));

        self.index.build(series_set, viewport);

        let events = self.coordinator.tick(now_ms, &self.index);

        Ok(FrameOutput { tier, lod, events })
    }

    pub fn mouse_move(&mut self, x: Real, y: Real, now_ms: i64) {
        self.coordinator.mouse_move(x, y, now_ms);
    }

    pub fn mouse_leave(&mut self) -> Vec<InteractionEvent> {
        self.coordinator.mouse_leave()
    }

    pub fn click(&mut self, x: Real, y: Real, now_ms: i64) -> Vec<InteractionEvent> {
        self.coordinator.click(x, y, now_ms, &self.index)
    }

    pub fn wheel(&mut self, delta: Real, anchor_x: Real, anchor_y: Real, now_ms: i64) {
        self.coordinator.wheel(delta, anchor_x, anchor_y, now_ms);
    }

    pub fn begin_brush(&mut self, x: Real, y: Real) -> Vec<InteractionEvent> {
        self.coordinator.begin_brush(x, y)
    }

    pub fn update_brush(&mut self, x: Real, y: Real) {
        self.coordinator.update_brush(x, y);
    }

    pub fn end_brush(&mut self) -> Vec<InteractionEvent> {
        self.coordinator.end_brush(&self.index)
    }

    /// Produce a screen-reader-friendly summary of the current series set.
    pub fn accessibility_summary(&self, series_set: &[Series]) -> Summary {
        accessibility::summarise(series_set)
    }

    /// Destroy every registered surface, in LIFO registration order, per
    /// the Surface lifecycle design note.
    pub fn shutdown(&mut self) {
        self.tier_engine.destroy_all();
    }
}

fn num_cpus_hint() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn available_memory_hint() -> u64 {
    // The core performs no platform-specific memory probing (would pull in
    // a host-OS dependency outside this crate's scope); callers that know
    // their device's memory budget should set `auto_detect = false` and
    // supply thresholds directly instead.
    4096
}

#[cfg(test)]
#[path = "viz_engine_tests.rs"]
mod tests;
