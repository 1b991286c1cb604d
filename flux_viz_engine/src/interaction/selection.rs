//! Selection state and the events the coordinator emits.
//!
//! Selection lives here, never on a surface, so it survives tier
//! transitions: attaching the coordinator to a new surface drains timers
//! and clears hover but leaves this struct untouched.

use std::collections::BTreeSet;

use crate::model::Rect;
use crate::spatial::HitResult;

/// `(series_id, point_key)` pair uniquely identifying a selectable point.
/// `point_key` is the point's index within its series; stable as long as
/// the series itself is not mutated mid-session.
pub type PointKey = (String, usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastClick {
    pub time_ms: i64,
    pub x: f64,
    pub y: f64,
}

/// The coordinator's persistent state: hover, the selection set, an
/// in-progress brush rectangle, and the last click (for double-click
/// detection).
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub hover: Option<HitResult>,
    pub selection: BTreeSet<PointKey>,
    pub brush: Option<Rect>,
    pub last_click: Option<LastClick>,
}

impl SelectionState {
    pub fn toggle(&mut self, key: PointKey) {
        if !self.selection.remove(&key) {
            self.selection.insert(key);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }
}

/// Events raised by the interaction coordinator in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    HoverChanged(HitResult),
    HoverCleared,
    SelectionChanged(Vec<PointKey>),
    ZoomReset,
    ZoomIntent { factor: f64, anchor_x: f64, anchor_y: f64 },
    BrushStarted,
    BrushEnded(Vec<PointKey>),
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
