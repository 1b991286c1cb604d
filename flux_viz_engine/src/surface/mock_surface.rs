//! Recording mock surface for tests: a `dyn Surface` implementation that
//! records calls instead of touching a GPU or a canvas.

use std::cell::RefCell;

use crate::error::Result;
use crate::model::{Rect, Series, Viewport};
use crate::perf::FrameMetric;
use crate::spatial::HitResult;
use super::{ContainerHandle, Surface, Tier};

/// One recorded call into a [`RecordingMockSurface`], used to assert the
/// per-frame call shape a real surface would see.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Initialize { container: String, width: u32, height: u32 },
    Render { series_count: usize },
    Resize { width: u32, height: u32 },
    Destroy,
    NearestHit { px: f64, py: f64, radius: f64 },
    RegionHit { rect: Rect },
}

pub struct RecordingMockSurface {
    pub tier: Tier,
    pub calls: RefCell<Vec<MockCall>>,
    pub destroyed: bool,
    pub hit_to_return: Option<HitResult>,
    pub region_to_return: Vec<HitResult>,
    pub metric_to_return: Option<FrameMetric>,
}

impl RecordingMockSurface {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            calls: RefCell::new(Vec::new()),
            destroyed: false,
            hit_to_return: None,
            region_to_return: Vec::new(),
            metric_to_return: None,
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }
}

impl Surface for RecordingMockSurface {
    fn initialize(&mut self, container: &ContainerHandle, viewport: &Viewport<'_>) -> Result<()> {
        self.calls.get_mut().push(MockCall::Initialize {
            container: container.0.clone(),
            width: viewport.width_px,
            height: viewport.height_px,
        });
        Ok(())
    }

    fn render(&mut self, series_set: &[Series], _viewport: &Viewport<'_>) -> Result<()> {
        if self.destroyed {
            crate::flux_bail!(SurfaceLifecycle, "flux::surface::mock", "render on destroyed surface");
        }
        self.calls.get_mut().push(MockCall::Render { series_count: series_set.len() });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.calls.get_mut().push(MockCall::Resize { width, height });
        Ok(())
    }

    fn destroy(&mut self) {
        self.calls.get_mut().push(MockCall::Destroy);
        self.destroyed = true;
    }

    fn nearest_hit(&self, px: f64, py: f64, radius: f64) -> Option<HitResult> {
        self.calls.borrow_mut().push(MockCall::NearestHit { px, py, radius });
        self.hit_to_return.clone()
    }

    fn region_hit(&self, rect: Rect) -> Vec<HitResult> {
        self.calls.borrow_mut().push(MockCall::RegionHit { rect });
        self.region_to_return.clone()
    }

    fn metrics(&self) -> Option<FrameMetric> {
        self.metric_to_return.clone()
    }

    fn tier(&self) -> Tier {
        self.tier
    }
}

#[path = "mock_surface_tests.rs"]
mod tests;
