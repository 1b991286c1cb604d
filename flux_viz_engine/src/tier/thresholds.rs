//! Device-class detection and validated threshold configuration.
//!
//! Kept off any global: `VizEngine::new` calls [`DeviceClass::detect`]
//! once and stores the resulting [`ThresholdConfig`] on the engine
//! instance, per the "Mutable global state" design note — tests inject a
//! fixed configuration instead of relying on process-wide detection.

use crate::model::Real;
use crate::surface::Tier;

/// Device-class heuristic bucket, used to pick a default threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Default,
    Mobile,
    LowPower,
    HighPerf,
}

impl DeviceClass {
    /// Pure heuristic over coarse device characteristics, applied once at
    /// engine construction.
    pub fn detect(available_cores: usize, available_memory_mb: u64, mobile_ua: bool) -> Self {
        if mobile_ua {
            return DeviceClass::Mobile;
        }
        if available_cores <= 2 || available_memory_mb < 2048 {
            return DeviceClass::LowPower;
        }
        if available_cores >= 8 && available_memory_mb >= 8192 {
            return DeviceClass::HighPerf;
        }
        DeviceClass::Default
    }

    fn defaults(self) -> ThresholdConfig {
        match self {
            DeviceClass::Default => ThresholdConfig {
                vec_to_ras: 5_000,
                ras_to_accel: 50_000,
                ppp_vec: 0.5,
                ppp_ras: 5.0,
                ppp_accel: 50.0,
                force_tier: None,
            },
            DeviceClass::Mobile => ThresholdConfig {
                vec_to_ras: 2_000,
                ras_to_accel: 20_000,
                ppp_vec: 0.3,
                ppp_ras: 3.0,
                ppp_accel: 30.0,
                force_tier: None,
            },
            DeviceClass::LowPower => ThresholdConfig {
                vec_to_ras: 3_000,
                ras_to_accel: 30_000,
                ppp_vec: 0.4,
                ppp_ras: 4.0,
                ppp_accel: 40.0,
                force_tier: None,
            },
            DeviceClass::HighPerf => ThresholdConfig {
                vec_to_ras: 10_000,
                ras_to_accel: 100_000,
                ppp_vec: 1.0,
                ppp_ras: 10.0,
                ppp_accel: 100.0,
                force_tier: None,
            },
        }
    }
}

/// Tier-selection thresholds, from the `thresholds` External Interfaces
/// option group. `validated()` clamps to the documented invariants rather
/// than returning an error, emitting a configuration warning instead (see
/// the Error Handling Design's Configuration row).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub vec_to_ras: u64,
    pub ras_to_accel: u64,
    pub ppp_vec: Real,
    pub ppp_ras: Real,
    pub ppp_accel: Real,
    pub force_tier: Option<Tier>,
}

impl ThresholdConfig {
    pub fn for_device_class(class: DeviceClass) -> Self {
        class.defaults()
    }

    /// Clamp `vec_to_ras >= 100` and `ras_to_accel >= vec_to_ras`.
    /// Returns the clamped config plus whether a clamp was actually applied
    /// (the caller emits a `Configuration` warning event when it was).
    pub fn validated(mut self) -> (Self, bool) {
        let mut clamped = false;
        if self.vec_to_ras < 100 {
            self.vec_to_ras = 100;
            clamped = true;
        }
        if self.ras_to_accel < self.vec_to_ras {
            self.ras_to_accel = self.vec_to_ras;
            clamped = true;
        }
        (self, clamped)
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        DeviceClass::Default.defaults()
    }
}

#[cfg(test)]
#[path = "thresholds_tests.rs"]
mod tests;
