use crate::model::{Rect, Series, Viewport};
use super::hit::HitResult;

/// Spatial acceleration structure over the projected pixel positions of a
/// series set, built fresh for one viewport.
///
/// Answers nearest/region pixel queries over `(series_id, point_index)`
/// pairs without rescanning every point in the series set.
pub trait SpatialIndex {
    /// Rebuild the index for this series set and viewport. Invalidates
    /// whatever was indexed before.
    fn build(&mut self, series_set: &[Series], viewport: &Viewport<'_>);

    /// Nearest visible point within `radius` pixels of `(px, py)`, or
    /// `None` if nothing is within range.
    fn nearest(&self, px: f64, py: f64, radius: f64) -> Option<HitResult>;

    /// All visible points whose projected pixel position falls inside
    /// `rect` (inclusive bounds), in series-then-index order.
    fn points_in_rect(&self, rect: Rect) -> Vec<HitResult>;

    /// Drop all indexed entries.
    fn clear(&mut self);
}
