//! Types produced and consumed by the LOD engine.

use crate::model::{DataPoint, Real};
use super::outliers::OutlierMethod;
use bitflags::bitflags;

bitflags! {
    /// Feature toggles for the LOD pipeline, as a typed `bitflags!` set
    /// rather than a grab-bag of booleans.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LodFeatures: u32 {
        const TEMPORAL_BUCKETING = 1 << 0;
        const ENVELOPE           = 1 << 1;
        const OUTLIER_PRESERVE   = 1 << 2;
        const ZOOM_REFINE        = 1 << 3;
    }
}

impl Default for LodFeatures {
    fn default() -> Self {
        LodFeatures::TEMPORAL_BUCKETING
            | LodFeatures::ENVELOPE
            | LodFeatures::OUTLIER_PRESERVE
            | LodFeatures::ZOOM_REFINE
    }
}

/// Configuration for a single [`LodEngine`](super::LodEngine) instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodConfig {
    pub features: LodFeatures,
    pub outlier_method: OutlierMethod,
    pub outlier_threshold: Real,
    pub max_outlier_percent: Real,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            features: LodFeatures::default(),
            outlier_method: OutlierMethod::ZScore,
            outlier_threshold: 3.0,
            max_outlier_percent: 10.0,
        }
    }
}

/// A temporal aggregation unit: one slice of the bucketed timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LODBucket {
    pub t_start: Real,
    pub t_end: Real,
    pub min_y: Real,
    pub max_y: Real,
    pub avg_y: Real,
    pub count: usize,
    pub representative: DataPoint,
    pub outliers: Vec<DataPoint>,
}

/// Coarseness level, derived from the bucket's compression ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LODLevel {
    Minimal = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Full = 4,
}

impl LODLevel {
    /// Level mapping by compression ratio, from a fixed descending table.
    pub fn from_compression_ratio(ratio: Real) -> Self {
        if ratio >= 100.0 {
            LODLevel::Minimal
        } else if ratio >= 50.0 {
            LODLevel::Low
        } else if ratio >= 10.0 {
            LODLevel::Medium
        } else if ratio >= 2.0 {
            LODLevel::High
        } else {
            LODLevel::Full
        }
    }
}

/// Output of a [`LodEngine::downsample`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct LODResult {
    pub buckets: Vec<LODBucket>,
    pub total_points: usize,
    pub sampled_points: usize,
    pub level: LODLevel,
    pub outlier_count: usize,
}

impl LODResult {
    pub fn empty() -> Self {
        Self {
            buckets: Vec::new(),
            total_points: 0,
            sampled_points: 0,
            level: LODLevel::Full,
            outlier_count: 0,
        }
    }

    pub fn compression_ratio(&self) -> Real {
        if self.sampled_points == 0 {
            1.0
        } else {
            self.total_points as Real / self.sampled_points as Real
        }
    }
}
