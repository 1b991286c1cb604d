//! Pure-function accessibility summariser: reduces a series set to
//! per-series statistics, a global envelope, trend direction and
//! anomalies, with a deterministic text rendering.

mod summary;

pub use summary::{AnomalyPoint, SeriesStats, Summary, Trend, summarise};
