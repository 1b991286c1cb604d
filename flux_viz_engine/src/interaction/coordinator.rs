//! Finite-state machine coordinating hover, click, brush and keyboard
//! input over whatever surface is currently live.
//!
//! Debounce timers are modeled as explicit deadlines checked on `tick`,
//! not spawned tasks: the entire core runs on one logical thread and
//! there is no executor to hand a task to.
//!
//! Pointer coordinates arrive in full-viewport pixels (whatever the host
//! application's event system reports) but the spatial index is built
//! against inner-area pixels (margins already subtracted, see
//! `Viewport::project`). Every method that takes `(x, y)` from the host
//! translates through `to_inner` before touching the index or the
//! selection's brush rect, so margins stay consistent end to end.

use crate::model::{DataPoint, Margins, Rect, Real, Series};
use crate::spatial::SpatialIndex;
use super::selection::{InteractionEvent, LastClick, PointKey, SelectionState};

/// Tuning knobs from the `interaction` External Interfaces option group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    pub hover_radius: f64,
    pub selection_radius: f64,
    pub hover_debounce_ms: i64,
    pub zoom_debounce_ms: i64,
    pub double_click_ms: i64,
    pub keyboard_nav_on: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hover_radius: 10.0,
            selection_radius: 15.0,
            hover_debounce_ms: 16,
            zoom_debounce_ms: 50,
            double_click_ms: 300,
            keyboard_nav_on: true,
        }
    }
}

const DOUBLE_CLICK_DISTANCE_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorState {
    Idle,
    Hovering,
    Brushing,
}

struct PendingHover {
    x: f64,
    y: f64,
    deadline_ms: i64,
}

struct PendingZoom {
    factor: f64,
    anchor_x: f64,
    anchor_y: f64,
    deadline_ms: i64,
}

/// Shared hover/click/brush/keyboard state machine. Owns [`SelectionState`]
/// so selection survives surface and tier transitions; never blocks.
pub struct InteractionCoordinator {
    config: InteractionConfig,
    state: CoordinatorState,
    selection: SelectionState,
    pending_hover: Option<PendingHover>,
    pending_zoom: Option<PendingZoom>,
    brush_anchor: Option<(f64, f64)>,
    margins: Margins,
}

impl InteractionCoordinator {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: CoordinatorState::Idle,
            selection: SelectionState::default(),
            pending_hover: None,
            pending_zoom: None,
            brush_anchor: None,
            margins: Margins::default(),
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Record the current viewport's margins, so subsequently reported
    /// pointer coordinates (given in full-viewport pixels) can be
    /// translated into the inner-area coordinates the spatial index was
    /// built against.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    fn to_inner(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.margins.left as f64, y - self.margins.top as f64)
    }

    /// Attaching to a new surface drains pending timers and clears hover,
    /// but the selection set is untouched.
    pub fn attach(&mut self) {
        self.pending_hover = None;
        self.pending_zoom = None;
        self.brush_anchor = None;
        self.selection.clear_hover();
        self.state = CoordinatorState::Idle;
    }

    pub fn mouse_move(&mut self, x: f64, y: f64, now_ms: i64) {
        if self.state == CoordinatorState::Brushing {
            // brushing ignores hover scheduling
            return;
        }
        let (x, y) = self.to_inner(x, y);
        self.pending_hover = Some(PendingHover { x, y, deadline_ms: now_ms + self.config.hover_debounce_ms });
    }

    pub fn mouse_leave(&mut self) -> Vec<InteractionEvent> {
        self.pending_hover = None;
        if self.selection.hover.is_some() {
            self.selection.clear_hover();
            self.state = CoordinatorState::Idle;
            vec![InteractionEvent::HoverCleared]
        } else {
            Vec::new()
        }
    }

    /// Advance pending debounced timers; fires any that have expired.
    pub fn tick(&mut self, now_ms: i64, index: &dyn SpatialIndex) -> Vec<InteractionEvent> {
        let mut events = Vec::new();

        if let Some(pending) = &self.pending_hover {
            if now_ms >= pending.deadline_ms {
                let hit = index.nearest(pending.x, pending.y, self.config.hover_radius);
                self.pending_hover = None;
                let identity_changed = hit_identity(&hit) != hit_identity(&self.selection.hover);
                if identity_changed {
                    self.selection.hover = hit.clone();
                    self.state = if hit.is_some() { CoordinatorState::Hovering } else { CoordinatorState::Idle };
                    match hit {
                        Some(h) => events.push(InteractionEvent::HoverChanged(h)),
                        None => events.push(InteractionEvent::HoverCleared),
                    }
                }
            }
        }

        if let Some(pending) = &self.pending_zoom {
            if now_ms >= pending.deadline_ms {
                events.push(InteractionEvent::ZoomIntent {
                    factor: pending.factor,
                    anchor_x: pending.anchor_x,
                    anchor_y: pending.anchor_y,
                });
                self.pending_zoom = None;
            }
        }

        events
    }

    /// Classify and handle a click. Single click toggles selection of the
    /// nearest point within `selection_radius`; a double click (within
    /// `double_click_ms` and 5px of the last click) emits a zoom-reset
    /// instead of toggling selection.
    pub fn click(&mut self, x: f64, y: f64, now_ms: i64, index: &dyn SpatialIndex) -> Vec<InteractionEvent> {
        let (x, y) = self.to_inner(x, y);
        let is_double = match self.selection.last_click {
            Some(last) => {
                let dt = now_ms - last.time_ms;
                let dist = ((x - last.x).powi(2) + (y - last.y).powi(2)).sqrt();
                dt <= self.config.double_click_ms && dist <= DOUBLE_CLICK_DISTANCE_PX
            }
            None => false,
        };
        self.selection.last_click = Some(LastClick { time_ms: now_ms, x, y });

        if is_double {
            return vec![InteractionEvent::ZoomReset];
        }

        let Some(hit) = index.nearest(x, y, self.config.selection_radius) else {
            return Vec::new();
        };
        let key: PointKey = (hit.series_id.clone(), hit.point_index);
        self.selection.toggle(key);
        vec![InteractionEvent::SelectionChanged(self.selection.selection.iter().cloned().collect())]
    }

    /// Schedule a debounced zoom intent; direction determines the factor.
    pub fn wheel(&mut self, delta: Real, anchor_x: f64, anchor_y: f64, now_ms: i64) {
        let factor = if delta > 0.0 { 1.1 } else { 0.9 };
        self.pending_zoom = Some(PendingZoom {
            factor,
            anchor_x,
            anchor_y,
            deadline_ms: now_ms + self.config.zoom_debounce_ms,
        });
    }

    pub fn begin_brush(&mut self, x: f64, y: f64) -> Vec<InteractionEvent> {
        self.brush_anchor = Some(self.to_inner(x, y));
        self.state = CoordinatorState::Brushing;
        vec![InteractionEvent::BrushStarted]
    }

    pub fn update_brush(&mut self, x: f64, y: f64) {
        if let Some((ax, ay)) = self.brush_anchor {
            let (x, y) = self.to_inner(x, y);
            self.selection.brush = Some(Rect::from_corners(ax, ay, x, y));
        }
    }

    /// Query the region under the current brush rect and replace the
    /// selection set with the result.
    pub fn end_brush(&mut self, index: &dyn SpatialIndex) -> Vec<InteractionEvent> {
        let Some(rect) = self.selection.brush.take() else {
            self.state = CoordinatorState::Idle;
            return Vec::new();
        };
        self.brush_anchor = None;
        self.state = CoordinatorState::Idle;

        let hits = index.points_in_rect(rect);
        let keys: Vec<PointKey> = hits.into_iter().map(|h| (h.series_id, h.point_index)).collect();
        self.selection.selection = keys.iter().cloned().collect();
        vec![InteractionEvent::BrushEnded(keys)]
    }

    /// `Enter` adds the current hover to the selection.
    pub fn key_enter(&mut self) -> Vec<InteractionEvent> {
        let Some(hit) = self.selection.hover.clone() else {
            return Vec::new();
        };
        let key = (hit.series_id, hit.point_index);
        self.selection.selection.insert(key);
        vec![InteractionEvent::SelectionChanged(self.selection.selection.iter().cloned().collect())]
    }

    /// `Escape` clears the selection.
    pub fn key_escape(&mut self) -> Vec<InteractionEvent> {
        self.selection.clear_selection();
        vec![InteractionEvent::SelectionChanged(Vec::new())]
    }

    /// `<-`/`->` navigate to the adjacent point in `series`, relative to
    /// the current hover's index, wrapping only if `keyboard_nav_on`.
    pub fn navigate(&self, series: &Series, forward: bool) -> Option<DataPoint> {
        let len = series.data.len();
        if len == 0 {
            return None;
        }
        let current = self
            .selection
            .hover
            .as_ref()
            .filter(|h| h.series_id == series.id)
            .map(|h| h.point_index);

        let next_index = match current {
            None => if forward { 0 } else { len - 1 },
            Some(idx) => {
                if forward {
                    if idx + 1 < len {
                        idx + 1
                    } else if self.config.keyboard_nav_on {
                        0
                    } else {
                        return None;
                    }
                } else if idx > 0 {
                    idx - 1
                } else if self.config.keyboard_nav_on {
                    len - 1
                } else {
                    return None;
                }
            }
        };

        series.data.get(next_index).cloned()
    }
}

fn hit_identity(hit: &Option<crate::spatial::HitResult>) -> Option<(String, usize)> {
    hit.as_ref().map(|h| (h.series_id.clone(), h.point_index))
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
