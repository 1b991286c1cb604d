//! Frame-metric ring buffer and degradation policy.

mod frame_metric;
mod ring;

pub use frame_metric::FrameMetric;
pub use ring::FrameMetricRing;
