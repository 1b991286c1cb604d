//! Tier selection: picks and transitions among Vector, Raster and
//! Accelerated render tiers based on data density, device capability and
//! rolling frame-time history.

mod thresholds;
mod events;
mod engine;

pub use thresholds::{DeviceClass, ThresholdConfig};
pub use events::{EngineEvent, SubscriberKey, TierSwitchReason};
pub use engine::{PerfPolicy, TierEngine};
