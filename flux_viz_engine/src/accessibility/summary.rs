//! Accessibility summariser: a pure function from a series set to a
//! structured, screen-reader-friendly summary. No I/O.

use std::fmt;

use crate::model::{DataPoint, Real, Series};

const ANOMALY_STDDEV_THRESHOLD: Real = 3.0;
const MAX_ANOMALIES: usize = 10;
const TREND_EPSILON: Real = 1e-9;
const TREND_THRESHOLD: Real = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        write!(f, "{}", label)
    }
}

/// Per-series statistics and trend classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub series_id: String,
    pub min: Real,
    pub max: Real,
    pub mean: Real,
    pub stddev: Real,
    pub trend: Trend,
    /// `|last - first| / (max - min)`, clamped to `1.0`; `0.0` on a
    /// degenerate (single-point or flat) series.
    pub trend_strength: Real,
}

/// A point flagged more than three standard deviations from its series
/// mean, ranked by how far it deviates.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyPoint {
    pub series_id: String,
    pub point: DataPoint,
    pub deviation: Real,
}

/// Structured result of [`summarise`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub per_series: Vec<SeriesStats>,
    pub time_range: Option<(Real, Real)>,
    pub global_min: Option<Real>,
    pub global_max: Option<Real>,
    /// Capped at 10, sorted by descending deviation.
    pub anomalies: Vec<AnomalyPoint>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accessibility summary")?;
        match self.time_range {
            Some((start, end)) => writeln!(f, "  time range: {:.3} to {:.3}", start, end)?,
            None => writeln!(f, "  time range: (no data)")?,
        }
        match (self.global_min, self.global_max) {
            (Some(min), Some(max)) => writeln!(f, "  value range: {:.3} to {:.3}", min, max)?,
            _ => writeln!(f, "  value range: (no data)")?,
        }
        writeln!(f, "  series ({}):", self.per_series.len())?;
        for stats in &self.per_series {
            writeln!(
                f,
                "    {}: min={:.3} max={:.3} mean={:.3} stddev={:.3} trend={} ({:.0}%)",
                stats.series_id,
                stats.min,
                stats.max,
                stats.mean,
                stats.stddev,
                stats.trend,
                stats.trend_strength * 100.0
            )?;
        }
        if self.anomalies.is_empty() {
            writeln!(f, "  anomalies: none")?;
        } else {
            writeln!(f, "  anomalies ({}):", self.anomalies.len())?;
            for anomaly in &self.anomalies {
                writeln!(
                    f,
                    "    {} at x={:.3}, y={:.3} (deviation {:.2}σ)",
                    anomaly.series_id,
                    anomaly.point.x.as_f64(),
                    anomaly.point.y,
                    anomaly.deviation
                )?;
            }
        }
        Ok(())
    }
}

/// Summarise a series set: per-series min/max/mean/stddev and trend, the
/// union time range, the global value envelope, and the ten most severe
/// anomalies across the whole set. NaN/Infinity `y` values never enter
/// any aggregate.
pub fn summarise(series_set: &[Series]) -> Summary {
    let mut per_series = Vec::with_capacity(series_set.len());
    let mut all_anomalies = Vec::new();
    let mut time_range: Option<(Real, Real)> = None;
    let mut global_min: Option<Real> = None;
    let mut global_max: Option<Real> = None;

    for series in series_set {
        let finite: Vec<&DataPoint> = series.data.iter().filter(|p| p.y_is_finite()).collect();
        if finite.is_empty() {
            continue;
        }

        let min = finite.iter().map(|p| p.y).fold(Real::INFINITY, Real::min);
        let max = finite.iter().map(|p| p.y).fold(Real::NEG_INFINITY, Real::max);
        let mean = finite.iter().map(|p| p.y).sum::<Real>() / finite.len() as Real;
        let variance =
            finite.iter().map(|p| (p.y - mean).powi(2)).sum::<Real>() / finite.len() as Real;
        let stddev = variance.sqrt();

        let first = finite.first().unwrap().y;
        let last = finite.last().unwrap().y;
        let delta = last - first;
        let trend = if delta.abs() / mean.abs().max(TREND_EPSILON) > TREND_THRESHOLD {
            if delta > 0.0 { Trend::Up } else { Trend::Down }
        } else {
            Trend::Stable
        };
        let spread = max - min;
        let trend_strength = if spread > TREND_EPSILON {
            (delta.abs() / spread).min(1.0)
        } else {
            0.0
        };

        for point in &finite {
            if stddev > TREND_EPSILON {
                let deviation = (point.y - mean).abs() / stddev;
                if deviation > ANOMALY_STDDEV_THRESHOLD {
                    all_anomalies.push(AnomalyPoint {
                        series_id: series.id.clone(),
                        point: (*point).clone(),
                        deviation,
                    });
                }
            }
        }

        let series_x_range = (
            finite.iter().map(|p| p.x.as_f64()).fold(Real::INFINITY, Real::min),
            finite.iter().map(|p| p.x.as_f64()).fold(Real::NEG_INFINITY, Real::max),
        );
        time_range = Some(match time_range {
            None => series_x_range,
            Some((start, end)) => (start.min(series_x_range.0), end.max(series_x_range.1)),
        });
        global_min = Some(global_min.map_or(min, |g: Real| g.min(min)));
        global_max = Some(global_max.map_or(max, |g: Real| g.max(max)));

        per_series.push(SeriesStats {
            series_id: series.id.clone(),
            min,
            max,
            mean,
            stddev,
            trend,
            trend_strength,
        });
    }

    all_anomalies.sort_by(|a, b| b.deviation.partial_cmp(&a.deviation).unwrap());
    all_anomalies.truncate(MAX_ANOMALIES);

    Summary { per_series, time_range, global_min, global_max, anomalies: all_anomalies }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
