//! Downsampling engine: bucket assignment, envelope computation, and
//! representative-point selection.

use crate::model::{DataPoint, Real};
use super::ladder::snap_to_nice_width;
use super::outliers::{cap_outliers, detect};
use super::types::{LODBucket, LODLevel, LODResult, LodConfig, LodFeatures};

/// Stateless downsampler parameterised by a fixed [`LodConfig`].
///
/// `downsample` and `zoom_refine` are pure functions: config and outlier
/// method live on the instance, there is no interior mutability and no
/// caching (caching is explicitly optional per the data model and is left
/// to the caller).
pub struct LodEngine {
    config: LodConfig,
}

impl LodEngine {
    pub fn new(config: LodConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Reduce `points` to at most around `target` buckets.
    pub fn downsample(
        &self,
        points: &[DataPoint],
        target: usize,
        time_window: Option<(Real, Real)>,
    ) -> LODResult {
        if target == 0 || points.is_empty() {
            return LODResult::empty();
        }

        if points.len() <= target {
            return self.fast_path(points);
        }

        let finite: Vec<&DataPoint> = points.iter().filter(|p| p.y_is_finite()).collect();
        if finite.is_empty() {
            return LODResult::empty();
        }

        let (t_lo, t_hi) = time_window.unwrap_or_else(|| Self::x_extrema(points));
        if !(t_hi > t_lo) {
            return self.fast_path(points);
        }

        let raw_width = (t_hi - t_lo) / target as Real;
        let width = if self.config.features.contains(LodFeatures::TEMPORAL_BUCKETING) {
            snap_to_nice_width(raw_width)
        } else {
            raw_width
        };
        let num_buckets = (((t_hi - t_lo) / width).ceil() as usize).max(1);

        let mut bucket_indices: Vec<Vec<usize>> = vec![Vec::new(); num_buckets];
        for (i, p) in finite.iter().enumerate() {
            let x = p.x.as_f64();
            let raw_idx = ((x - t_lo) / width).floor();
            let idx = if raw_idx < 0.0 {
                0
            } else {
                (raw_idx as usize).min(num_buckets - 1)
            };
            bucket_indices[idx].push(i);
        }

        let outlier_local_indices: Vec<usize> = if self
            .config
            .features
            .contains(LodFeatures::OUTLIER_PRESERVE)
        {
            let candidates = detect(&finite, self.config.outlier_method, self.config.outlier_threshold);
            cap_outliers(&finite, &candidates, self.config.max_outlier_percent)
        } else {
            Vec::new()
        };
        let outlier_count = outlier_local_indices.len();

        let mut buckets = Vec::with_capacity(num_buckets);
        for (b, members) in bucket_indices.into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let t_start = t_lo + b as Real * width;
            let t_end = if b + 1 == num_buckets { t_hi } else { t_lo + (b + 1) as Real * width };
            let bucket_outliers: Vec<usize> = outlier_local_indices
                .iter()
                .copied()
                .filter(|&oi| members.contains(&oi))
                .collect();

            buckets.push(self.build_bucket(
                &finite,
                &members,
                &bucket_outliers,
                t_start,
                t_end,
                b,
            ));
        }

        let sampled_points = buckets.len();
        let mut result = LODResult {
            buckets,
            total_points: points.len(),
            sampled_points,
            level: LODLevel::Full,
            outlier_count,
        };
        result.level = LODLevel::from_compression_ratio(result.compression_ratio());
        result
    }

    /// Filter to a visible sub-window then re-downsample at up to twice the
    /// requested target, per the zoom-refinement contract.
    pub fn zoom_refine(
        &self,
        points: &[DataPoint],
        target: usize,
        visible_window: (Real, Real),
    ) -> LODResult {
        let (lo, hi) = visible_window;
        let visible: Vec<DataPoint> = points
            .iter()
            .filter(|p| {
                let x = p.x.as_f64();
                x >= lo && x <= hi
            })
            .cloned()
            .collect();
        let refined_target = (2 * target).min(visible.len().max(1));
        self.downsample(&visible, refined_target, Some((lo, hi)))
    }

    /// Below-budget or degenerate-window path: one bucket per point, no
    /// aggregation. NaN/Infinity `y` values are excluded the same as the
    /// bucketed path, since a single-point bucket's min/max/avg would
    /// otherwise just be that non-finite value.
    fn fast_path(&self, points: &[DataPoint]) -> LODResult {
        let buckets = points
            .iter()
            .filter(|p| p.y_is_finite())
            .map(|p| {
                let x = p.x.as_f64();
                LODBucket {
                    t_start: x,
                    t_end: x + 1.0,
                    min_y: p.y,
                    max_y: p.y,
                    avg_y: p.y,
                    count: 1,
                    representative: p.clone(),
                    outliers: Vec::new(),
                }
            })
            .collect::<Vec<_>>();
        let sampled_points = buckets.len();
        LODResult {
            buckets,
            total_points: points.len(),
            sampled_points,
            level: LODLevel::Full,
            outlier_count: 0,
        }
    }

    fn x_extrema(points: &[DataPoint]) -> (Real, Real) {
        let mut lo = Real::INFINITY;
        let mut hi = Real::NEG_INFINITY;
        for p in points {
            let x = p.x.as_f64();
            if x < lo {
                lo = x;
            }
            if x > hi {
                hi = x;
            }
        }
        (lo, hi)
    }

    fn build_bucket(
        &self,
        finite: &[&DataPoint],
        members: &[usize],
        bucket_outlier_indices: &[usize],
        t_start: Real,
        t_end: Real,
        bucket_index: usize,
    ) -> LODBucket {
        let min_y = members.iter().map(|&i| finite[i].y).fold(Real::INFINITY, Real::min);
        let max_y = members.iter().map(|&i| finite[i].y).fold(Real::NEG_INFINITY, Real::max);
        let avg_y = members.iter().map(|&i| finite[i].y).sum::<Real>() / members.len() as Real;

        let outliers: Vec<DataPoint> = bucket_outlier_indices
            .iter()
            .map(|&i| finite[i].clone())
            .collect();

        let representative = self.select_representative(
            finite,
            members,
            bucket_outlier_indices,
            min_y,
            max_y,
            avg_y,
            t_start,
            t_end,
            bucket_index,
        );

        LODBucket {
            t_start,
            t_end,
            min_y,
            max_y,
            avg_y,
            count: members.len(),
            representative,
            outliers,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn select_representative(
        &self,
        finite: &[&DataPoint],
        members: &[usize],
        bucket_outlier_indices: &[usize],
        min_y: Real,
        max_y: Real,
        avg_y: Real,
        t_start: Real,
        t_end: Real,
        bucket_index: usize,
    ) -> DataPoint {
        if !bucket_outlier_indices.is_empty() {
            let mut best = bucket_outlier_indices[0];
            let mut best_dev = (finite[best].y - avg_y).abs();
            for &i in &bucket_outlier_indices[1..] {
                let dev = (finite[i].y - avg_y).abs();
                if dev > best_dev
                    || (dev == best_dev && finite[i].x.as_f64() < finite[best].x.as_f64())
                {
                    best = i;
                    best_dev = dev;
                }
            }
            return finite[best].clone();
        }

        if max_y > min_y {
            let r = (avg_y - min_y) / (max_y - min_y);
            if r > 0.7 {
                return self.earliest_achieving(finite, members, max_y);
            }
            if r < 0.3 {
                return self.earliest_achieving(finite, members, min_y);
            }
            let mid = (t_start + t_end) / 2.0;
            return DataPoint::new(mid, avg_y).with_id(format!("bucket-{}-avg", bucket_index));
        }

        // Degenerate bucket: max == min, fall back to first point by x.
        let mut best = members[0];
        for &i in &members[1..] {
            if finite[i].x.as_f64() < finite[best].x.as_f64() {
                best = i;
            }
        }
        finite[best].clone()
    }

    fn earliest_achieving(&self, finite: &[&DataPoint], members: &[usize], target_y: Real) -> DataPoint {
        let mut best: Option<usize> = None;
        for &i in members {
            if finite[i].y == target_y {
                match best {
                    None => best = Some(i),
                    Some(b) if finite[i].x.as_f64() < finite[b].x.as_f64() => best = Some(i),
                    _ => {}
                }
            }
        }
        finite[best.expect("target_y must be achieved by some member")].clone()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
