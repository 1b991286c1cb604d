//! Tier selection, auto-degrade and the event bus that ties them to
//! observers.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::Real;
use crate::perf::{FrameMetric, FrameMetricRing};
use crate::surface::{Surface, Tier};
use super::events::{EngineEvent, EventBus, SubscriberKey, TierSwitchReason};
use super::thresholds::ThresholdConfig;

/// Performance budgets and the auto-degrade policy, from the `perf`
/// External Interfaces option group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfPolicy {
    pub target_frame_time_ms: Real,
    pub max_frame_time_ms: Real,
    pub auto_degrade: bool,
    pub degrade_frame_threshold: usize,
}

impl Default for PerfPolicy {
    fn default() -> Self {
        Self {
            target_frame_time_ms: 16.67,
            max_frame_time_ms: 33.33,
            auto_degrade: true,
            degrade_frame_threshold: 10,
        }
    }
}

const DENSITY_SIGNATURE_DELTA: usize = 1_000;
const FULL_REEVAL_FRAME_INTERVAL: u64 = 30;

/// Owns the registered surfaces, current tier, frame-metric ring and
/// event subscribers. Never behind a global; `VizEngine` owns exactly one.
pub struct TierEngine {
    thresholds: ThresholdConfig,
    perf: PerfPolicy,
    surfaces: HashMap<Tier, Box<dyn Surface>>,
    /// Registration order, so `destroy_all` can tear surfaces down LIFO
    /// per the Surface lifecycle design note.
    registration_order: Vec<Tier>,
    current_tier: Option<Tier>,
    ring: FrameMetricRing,
    last_total_points: Option<usize>,
    frame_counter: u64,
    event_bus: EventBus,
}

impl TierEngine {
    pub fn new(thresholds: ThresholdConfig, perf: PerfPolicy) -> Self {
        let (validated, clamped) = thresholds.validated();
        let mut engine = Self {
            thresholds: validated,
            perf,
            surfaces: HashMap::new(),
            registration_order: Vec::new(),
            current_tier: None,
            ring: FrameMetricRing::default(),
            last_total_points: None,
            frame_counter: 0,
            event_bus: EventBus::new(),
        };
        if clamped {
            engine.emit(EngineEvent::Error {
                message: "threshold configuration clamped to valid range".to_string(),
            });
        }
        engine
    }

    pub fn register_surface(&mut self, tier: Tier, surface: Box<dyn Surface>) -> Result<()> {
        if self.surfaces.contains_key(&tier) {
            crate::flux_bail!(
                SurfaceLifecycle,
                "flux::tier",
                "surface already registered for tier {:?}",
                tier
            );
        }
        self.surfaces.insert(tier, surface);
        self.registration_order.push(tier);
        Ok(())
    }

    /// Mutable access to the surface registered for `tier`, if any.
    pub fn surface_mut(&mut self, tier: Tier) -> Option<&mut Box<dyn Surface>> {
        self.surfaces.get_mut(&tier)
    }

    /// Destroy every registered surface in LIFO registration order.
    pub fn destroy_all(&mut self) {
        while let Some(tier) = self.registration_order.pop() {
            if let Some(mut surface) = self.surfaces.remove(&tier) {
                surface.destroy();
            }
        }
        self.current_tier = None;
    }

    pub fn subscribe(&mut self, handler: Box<dyn FnMut(&EngineEvent)>) -> SubscriberKey {
        self.event_bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, key: SubscriberKey) -> bool {
        self.event_bus.unsubscribe(key)
    }

    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    pub fn current_tier(&self) -> Option<Tier> {
        self.current_tier
    }

    pub fn ring(&self) -> &FrameMetricRing {
        &self.ring
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdConfig) {
        let (validated, clamped) = thresholds.validated();
        self.thresholds = validated;
        if clamped {
            self.emit(EngineEvent::Error {
                message: "threshold configuration clamped to valid range".to_string(),
            });
        }
    }

    fn available(&self, tier: Tier) -> bool {
        self.surfaces.contains_key(&tier)
    }

    /// Walk `Accelerated -> Raster -> Vector` from `tier` until an
    /// available surface is found. `None` means no surfaces at all are
    /// registered, which is a fatal condition.
    fn fallback_from(&self, tier: Tier) -> Option<Tier> {
        let start = Tier::FALLBACK_ORDER.iter().position(|&t| t == tier).unwrap_or(0);
        Tier::FALLBACK_ORDER[start..].iter().copied().find(|&t| self.available(t))
    }

    /// The tier chosen by point count and density alone, before capability
    /// fallback and before a `force_tier` override.
    fn ideal_tier(&self, total_points: usize, points_per_pixel: Real) -> Tier {
        let mut chosen = Tier::Vector;
        if total_points as u64 >= self.thresholds.ras_to_accel {
            chosen = Tier::Accelerated;
        } else if total_points as u64 >= self.thresholds.vec_to_ras {
            chosen = Tier::Raster;
        }

        if points_per_pixel >= self.thresholds.ppp_accel {
            chosen = chosen.max(Tier::Accelerated);
        } else if points_per_pixel >= self.thresholds.ppp_ras {
            chosen = chosen.max(Tier::Raster);
        }
        chosen
    }

    /// Full tier selection: a `force_tier` override wins outright when
    /// available, otherwise density/count selection followed by capability
    /// fallback. `None` means no tier at all is available (no surfaces
    /// registered).
    pub fn select_tier(&self, total_points: usize, points_per_pixel: Real, force_tier: Option<Tier>) -> Option<Tier> {
        if let Some(forced) = force_tier {
            if self.available(forced) {
                return Some(forced);
            }
        }
        self.fallback_from(self.ideal_tier(total_points, points_per_pixel))
    }

    /// Decide whether a full re-evaluation should run this render: the
    /// first call, a density-signature jump of >= 1,000 points, or every
    /// 30th frame regardless.
    fn should_reevaluate(&self, total_points: usize) -> bool {
        match self.last_total_points {
            None => true,
            Some(last) => {
                let delta = total_points.abs_diff(last);
                delta >= DENSITY_SIGNATURE_DELTA || self.frame_counter % FULL_REEVAL_FRAME_INTERVAL == 0
            }
        }
    }

    /// Run tier selection for this render, switching and emitting a
    /// `TierSwitch` event if the outcome differs from the current tier.
    /// Returns the tier to render with this frame.
    pub fn evaluate(
        &mut self,
        total_points: usize,
        points_per_pixel: Real,
        force_tier: Option<Tier>,
    ) -> Result<Tier> {
        self.frame_counter += 1;

        if !self.should_reevaluate(total_points) {
            if let Some(tier) = self.current_tier {
                return Ok(tier);
            }
        }

        self.last_total_points = Some(total_points);

        let (ideal, reason_if_direct) = match force_tier {
            Some(forced) => (forced, TierSwitchReason::Manual),
            None => (self.ideal_tier(total_points, points_per_pixel), TierSwitchReason::Density),
        };

        let Some(chosen) = self.select_tier(total_points, points_per_pixel, force_tier) else {
            crate::flux_bail!(Fatal, "flux::tier", "no surfaces registered; cannot render any tier");
        };

        let reason = if chosen == ideal { reason_if_direct } else { TierSwitchReason::Fallback };
        self.transition_to(chosen, reason, total_points as Real, points_per_pixel);
        Ok(chosen)
    }

    fn transition_to(&mut self, to: Tier, reason: TierSwitchReason, density: Real, avg_frame_time: Real) {
        let previous = self.current_tier;
        if previous == Some(to) {
            return;
        }
        self.current_tier = Some(to);
        let from = previous.unwrap_or(Tier::Vector);
        self.emit(EngineEvent::TierSwitch { from, to, reason, density, avg_frame_time });
    }

    /// Record a frame's cost and apply auto-degrade: after
    /// `degrade_frame_threshold` consecutive over-budget frames, step
    /// down exactly one tier and emit a performance `TierSwitch`.
    pub fn record_frame(&mut self, metric: FrameMetric) {
        self.ring.record(metric);

        if !self.perf.auto_degrade {
            return;
        }
        let violations = self.ring.violation_count();
        if violations >= self.perf.degrade_frame_threshold {
            if let Some(current) = self.current_tier {
                if let Some(lower) = Self::one_step_down(current) {
                    if self.available(lower) {
                        let avg = self.ring.average_frame_time(metric.timestamp, 10_000);
                        self.current_tier = Some(lower);
                        self.emit(EngineEvent::TierSwitch {
                            from: current,
                            to: lower,
                            reason: TierSwitchReason::Performance,
                            density: metric.point_count as Real,
                            avg_frame_time: avg,
                        });
                        self.emit(EngineEvent::PerformanceViolation { consecutive_dropped: violations });
                    }
                }
            }
        }
    }

    fn one_step_down(tier: Tier) -> Option<Tier> {
        match tier {
            Tier::Accelerated => Some(Tier::Raster),
            Tier::Raster => Some(Tier::Vector),
            Tier::Vector => None,
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        self.event_bus.dispatch(&event);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
