//! Statistical outlier detection and percentile capping.
//!
//! Candidate ranking uses `rdst` radix sort over deviation magnitude
//! rather than a comparison sort, since the candidate set can be large
//! and a linear-time radix pass beats `O(n log n)` on this rank-selection
//! hot path.

use crate::model::{DataPoint, Real};
use rdst::{RadixKey, RadixSort};

/// Outlier detection strategy, selected via [`super::LodConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierMethod {
    /// `|y - mean| / stddev > threshold`. Requires n >= 3.
    ZScore,
    /// Outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`. Requires n >= 4.
    Iqr,
    /// `|y - median| / MAD > threshold`. Requires n >= 3.
    Mad,
}

/// A candidate outlier: its index into the finite-y subset and how far it
/// deviates from the method's reference point, used for ranking.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    deviation: Real,
}

/// Wraps a deviation for radix sort: `rdst` sorts ascending by raw key
/// bytes, so the ranking pass below reverses the sorted order to get
/// most-extreme-first.
#[derive(Clone, Copy)]
struct RankKey {
    deviation_bits: u64,
    index: usize,
}

impl RadixKey for RankKey {
    const LEVELS: usize = 8;

    fn get_level(&self, level: usize) -> u8 {
        (self.deviation_bits >> (level * 8)) as u8
    }
}

/// Detect outliers in `points` (NaN/Infinity already excluded by caller),
/// returning their indices into `points`. Does not apply the percentile
/// cap; see [`cap_outliers`].
pub fn detect(points: &[&DataPoint], method: OutlierMethod, threshold: Real) -> Vec<usize> {
    let n = points.len();
    match method {
        OutlierMethod::ZScore => detect_zscore(points, threshold, n),
        OutlierMethod::Iqr => detect_iqr(points, n),
        OutlierMethod::Mad => detect_mad(points, threshold, n),
    }
}

fn mean_of(points: &[&DataPoint]) -> Real {
    points.iter().map(|p| p.y).sum::<Real>() / points.len() as Real
}

fn stddev_of(points: &[&DataPoint], mean: Real) -> Real {
    let variance =
        points.iter().map(|p| (p.y - mean).powi(2)).sum::<Real>() / points.len() as Real;
    variance.sqrt()
}

fn detect_zscore(points: &[&DataPoint], threshold: Real, n: usize) -> Vec<usize> {
    if n < 3 {
        return Vec::new();
    }
    let mean = mean_of(points);
    let stddev = stddev_of(points, mean);
    if stddev == 0.0 {
        return Vec::new();
    }
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| ((p.y - mean) / stddev).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

fn sorted_ys(points: &[&DataPoint]) -> Vec<Real> {
    let mut ys: Vec<Real> = points.iter().map(|p| p.y).collect();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ys
}

/// Linear-interpolation percentile, matching the common statistics
/// convention used for quartiles.
fn percentile(sorted: &[Real], p: Real) -> Real {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p * (sorted.len() - 1) as Real;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as Real;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

fn detect_iqr(points: &[&DataPoint], n: usize) -> Vec<usize> {
    if n < 4 {
        return Vec::new();
    }
    let sorted = sorted_ys(points);
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo = q1 - 1.5 * iqr;
    let hi = q3 + 1.5 * iqr;
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.y < lo || p.y > hi)
        .map(|(i, _)| i)
        .collect()
}

fn median_of(sorted: &[Real]) -> Real {
    let len = sorted.len();
    if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    }
}

fn detect_mad(points: &[&DataPoint], threshold: Real, n: usize) -> Vec<usize> {
    if n < 3 {
        return Vec::new();
    }
    let sorted = sorted_ys(points);
    let median = median_of(&sorted);
    let mut abs_devs: Vec<Real> = points.iter().map(|p| (p.y - median).abs()).collect();
    abs_devs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mad = median_of(&abs_devs);
    if mad == 0.0 {
        return Vec::new();
    }
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| ((p.y - median).abs() / mad) > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Cap a set of candidate outlier indices to `floor(n * max_percent / 100)`,
/// keeping the most extreme deviations first; ties broken by earlier `x`.
pub fn cap_outliers(
    points: &[&DataPoint],
    candidate_indices: &[usize],
    max_percent: Real,
) -> Vec<usize> {
    let n = points.len();
    let cap = ((n as Real) * max_percent / 100.0).floor() as usize;
    if candidate_indices.len() <= cap {
        return candidate_indices.to_vec();
    }
    if cap == 0 {
        return Vec::new();
    }

    let reference = detect_reference_point(points, candidate_indices);

    let mut keyed: Vec<RankKey> = candidate_indices
        .iter()
        .map(|&idx| {
            let deviation = (points[idx].y - reference).abs();
            RankKey { deviation_bits: deviation.to_bits(), index: idx }
        })
        .collect();
    keyed.radix_sort_unstable();

    // `radix_sort_unstable` orders ascending by the raw bit pattern of a
    // non-negative f64, which matches ascending numeric order, but it's
    // unstable: candidates tied on `deviation_bits` can land on either
    // side of the `take_from` cut. Resolve that explicitly instead of
    // trusting the sort's tail: split into values strictly above the
    // boundary deviation (always selected) and values at the boundary
    // (selected earliest-x-first, only as many as still fit the cap).
    let take_from = keyed.len() - cap;
    let boundary_bits = keyed[take_from].deviation_bits;

    let above_boundary: Vec<usize> = keyed[take_from..]
        .iter()
        .filter(|k| k.deviation_bits != boundary_bits)
        .map(|k| k.index)
        .collect();
    let needed_from_boundary = cap - above_boundary.len();

    let mut boundary_candidates: Vec<usize> = keyed
        .iter()
        .filter(|k| k.deviation_bits == boundary_bits)
        .map(|k| k.index)
        .collect();
    boundary_candidates
        .sort_by(|&a, &b| points[a].x.as_f64().partial_cmp(&points[b].x.as_f64()).unwrap());

    let mut selected = above_boundary;
    selected.extend(boundary_candidates.into_iter().take(needed_from_boundary));

    // Final output order: most-extreme-first, ties by earliest x.
    selected.sort_by(|&a, &b| {
        let dev_a = (points[a].y - reference).abs();
        let dev_b = (points[b].y - reference).abs();
        dev_b
            .partial_cmp(&dev_a)
            .unwrap()
            .then_with(|| points[a].x.as_f64().partial_cmp(&points[b].x.as_f64()).unwrap())
    });

    selected
}

/// All outlier methods ultimately measure distance from a central value;
/// reuse the dataset mean as that reference for ranking severity (z-score
/// and MAD differ only in how they flag, not in what "more extreme" means).
fn detect_reference_point(points: &[&DataPoint], candidate_indices: &[usize]) -> Real {
    let _ = candidate_indices;
    mean_of(points)
}

#[cfg(test)]
#[path = "outliers_tests.rs"]
mod tests;
