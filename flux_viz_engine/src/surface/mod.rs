//! The `Surface` trait: the contract between this crate and whatever
//! draws actual pixels (a vector draw-list builder, a 2D canvas backend,
//! a GPU vertex-buffer builder). The core never constructs or owns a
//! concrete surface implementation; the host application registers one
//! per tier it supports.

use crate::error::Result;
use crate::model::{Rect, Series, Viewport};
use crate::perf::FrameMetric;
use crate::spatial::HitResult;

#[cfg(test)]
mod mock_surface;
#[cfg(test)]
pub use mock_surface::{MockCall, RecordingMockSurface};

/// Logical rendering capability class, ordered by capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Tier {
    Vector,
    Raster,
    Accelerated,
}

impl Tier {
    /// Walk order used when a chosen tier is unavailable on this device;
    /// `Vector` is always available and terminates every walk.
    pub const FALLBACK_ORDER: [Tier; 3] = [Tier::Accelerated, Tier::Raster, Tier::Vector];
}

/// Opaque handle to whatever DOM/window/canvas container a surface draws
/// into. The core never inspects it.
pub struct ContainerHandle(pub String);

/// Capability interface every concrete render surface implements.
///
/// All variants must: clear prior visuals before each `render`; respect
/// series visibility; handle NaN `y` values by producing a gap rather
/// than connecting across them; and answer hit tests identically to the
/// `SpatialIndex`, never from a private structure of their own.
pub trait Surface {
    fn initialize(&mut self, container: &ContainerHandle, viewport: &Viewport<'_>) -> Result<()>;
    fn render(&mut self, series_set: &[Series], viewport: &Viewport<'_>) -> Result<()>;
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;
    fn destroy(&mut self);
    fn nearest_hit(&self, px: f64, py: f64, radius: f64) -> Option<HitResult>;
    fn region_hit(&self, rect: Rect) -> Vec<HitResult>;
    fn metrics(&self) -> Option<FrameMetric>;
    fn tier(&self) -> Tier;
}
