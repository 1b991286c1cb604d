/*!
# flux_viz_engine

Density-adaptive visualization back-end for time-series data.

This crate provides the platform-agnostic core for rendering large
time-series datasets at interactive frame rates: a level-of-detail (LOD)
engine that downsamples points to a target budget while preserving visual
outliers, a spatial index for O(1)-ish hit testing over the rendered
geometry, a tier engine that selects a rendering backend based on device
capability and live frame performance, and an interaction coordinator
that turns pointer/keyboard input into hover/click/brush state.

Backend implementations (the actual pixel-pushing) are supplied by the
host application through the [`surface::Surface`] trait; this crate never
touches a GPU or a canvas directly.

## Architecture

- [`model`]: shared data types (`DataPoint`, `Series`, `Viewport`, `Rect`, ...)
- [`lod`]: temporal bucketing, downsampling, outlier preservation
- [`spatial`]: grid-bucketed spatial index and hit testing
- [`surface`]: the `Surface` trait host applications implement, plus `Tier`
- [`tier`]: tier selection, threshold policy, the engine event bus
- [`perf`]: fixed-capacity frame metric ring buffer
- [`interaction`]: hover/click/brush finite state machine
- [`accessibility`]: textual summaries of the current view for screen readers
- [`VizEngine`]: the facade composing all of the above behind one per-frame entry point
*/

pub mod error;
pub mod log;

pub mod model;
pub mod lod;
pub mod spatial;
pub mod surface;
pub mod perf;
pub mod tier;
pub mod interaction;
pub mod accessibility;

mod viz_engine;

pub use error::{Error, Result};
pub use viz_engine::{
    AccessibilityConfig, EngineConfig, FrameOutput, ReducedMotion, ThresholdOverride, TierSignal, VizEngine,
};
