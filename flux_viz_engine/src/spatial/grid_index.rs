//! Uniform-grid spatial index.
//!
//! A viewport's data range isn't known ahead of time, so cells are
//! allocated lazily in a sparse `FxHashMap`-backed grid rather than a
//! statically pre-sized structure, and the whole index is rebuilt fresh
//! on every `build` call rather than incrementally updated.

use rustc_hash::FxHashMap;

use crate::model::{DataPoint, Rect, Series, Viewport};
use super::hit::HitResult;
use super::index::SpatialIndex;

#[derive(Debug, Clone)]
struct Entry {
    series_id: String,
    point_index: usize,
    px: f64,
    py: f64,
    point: DataPoint,
    seq: usize,
}

/// Uniform grid keyed by `(floor(px/cell), floor(py/cell))`.
pub struct GridSpatialIndex {
    hit_radius: f64,
    cell_size: f64,
    cells: FxHashMap<(i32, i32), Vec<Entry>>,
}

impl GridSpatialIndex {
    pub fn new(hit_radius: f64) -> Self {
        Self {
            hit_radius,
            cell_size: 2.0 * hit_radius,
            cells: FxHashMap::default(),
        }
    }

    fn cell_of(&self, px: f64, py: f64) -> (i32, i32) {
        ((px / self.cell_size).floor() as i32, (py / self.cell_size).floor() as i32)
    }

    /// Total number of indexed entries, used by tests to verify coverage.
    pub fn len(&self) -> usize {
        self.cells.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GridSpatialIndex {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl SpatialIndex for GridSpatialIndex {
    fn build(&mut self, series_set: &[Series], viewport: &Viewport<'_>) {
        self.clear();
        self.cell_size = 2.0 * self.hit_radius;

        let mut seq = 0usize;
        for series in series_set {
            if !series.visible {
                continue;
            }
            for (point_index, point) in series.data.iter().enumerate() {
                if !point.y_is_finite() {
                    // NaN/Infinity produces a rendering gap; it has no
                    // pixel position and is excluded from the index.
                    continue;
                }
                let (px, py) = viewport.project(point.x.as_f64(), point.y);
                let cell = self.cell_of(px, py);
                self.cells.entry(cell).or_default().push(Entry {
                    series_id: series.id.clone(),
                    point_index,
                    px,
                    py,
                    point: point.clone(),
                    seq,
                });
                seq += 1;
            }
        }
    }

    fn nearest(&self, px: f64, py: f64, radius: f64) -> Option<HitResult> {
        let (ci, cj) = self.cell_of(px, py);
        let mut best: Option<(&Entry, f64)> = None;

        for di in -1..=1 {
            for dj in -1..=1 {
                let Some(entries) = self.cells.get(&(ci + di, cj + dj)) else { continue };
                for e in entries {
                    let dist = ((e.px - px).powi(2) + (e.py - py).powi(2)).sqrt();
                    if dist >= radius {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((b, bd)) => {
                            dist < bd
                                || (dist == bd
                                    && (e.series_id.as_str(), e.point_index)
                                        < (b.series_id.as_str(), b.point_index))
                        }
                    };
                    if better {
                        best = Some((e, dist));
                    }
                }
            }
        }

        best.map(|(e, dist)| HitResult {
            series_id: e.series_id.clone(),
            point_index: e.point_index,
            point: e.point.clone(),
            pixel_x: e.px,
            pixel_y: e.py,
            distance: dist,
        })
    }

    fn points_in_rect(&self, rect: Rect) -> Vec<HitResult> {
        let ci1 = (rect.x1 / self.cell_size).floor() as i32;
        let ci2 = (rect.x2 / self.cell_size).floor() as i32;
        let cj1 = (rect.y1 / self.cell_size).floor() as i32;
        let cj2 = (rect.y2 / self.cell_size).floor() as i32;

        let mut matches: Vec<&Entry> = Vec::new();
        for i in ci1..=ci2 {
            for j in cj1..=cj2 {
                if let Some(entries) = self.cells.get(&(i, j)) {
                    matches.extend(entries.iter().filter(|e| rect.contains(e.px, e.py)));
                }
            }
        }
        matches.sort_by_key(|e| e.seq);
        matches
            .into_iter()
            .map(|e| HitResult {
                series_id: e.series_id.clone(),
                point_index: e.point_index,
                point: e.point.clone(),
                pixel_x: e.px,
                pixel_y: e.py,
                distance: 0.0,
            })
            .collect()
    }

    fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
#[path = "grid_index_tests.rs"]
mod tests;
