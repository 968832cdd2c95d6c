// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::VigilError;

pub const DEFAULT_WINDOW_PERIODS: usize = 12;
pub const DEFAULT_MIN_WINDOW_SAMPLES: usize = 3;
pub const DEFAULT_ALERT_Z: f64 = 1.0;
pub const DEFAULT_ALARM_Z: f64 = 2.0;

/// Z-score cut-offs; both bounds are inclusive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub alert_z: f64,
    pub alarm_z: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alert_z: DEFAULT_ALERT_Z,
            alarm_z: DEFAULT_ALARM_Z,
        }
    }
}

/// Parameters shared by the static and dynamic classifiers.
///
/// `window_periods` and `min_window_samples` only affect the dynamic model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub window_periods: usize,
    pub min_window_samples: usize,
    pub alert_z: f64,
    pub alarm_z: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_periods: DEFAULT_WINDOW_PERIODS,
            min_window_samples: DEFAULT_MIN_WINDOW_SAMPLES,
            alert_z: DEFAULT_ALERT_Z,
            alarm_z: DEFAULT_ALARM_Z,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), VigilError> {
        if self.window_periods == 0 {
            return Err(VigilError::invalid_config(format!(
                "window_periods must be >= 1; got {}",
                self.window_periods
            )));
        }
        if i64::try_from(self.window_periods).is_err() {
            return Err(VigilError::invalid_config(format!(
                "window_periods must fit in i64; got {}",
                self.window_periods
            )));
        }
        if self.min_window_samples < 2 {
            return Err(VigilError::invalid_config(format!(
                "min_window_samples must be >= 2; got {}",
                self.min_window_samples
            )));
        }
        if !self.alert_z.is_finite() || self.alert_z <= 0.0 {
            return Err(VigilError::invalid_config(format!(
                "alert_z must be finite and > 0; got {}",
                self.alert_z
            )));
        }
        if !self.alarm_z.is_finite() || self.alarm_z <= 0.0 {
            return Err(VigilError::invalid_config(format!(
                "alarm_z must be finite and > 0; got {}",
                self.alarm_z
            )));
        }
        if self.alert_z > self.alarm_z {
            return Err(VigilError::invalid_config(format!(
                "alert_z={} cannot exceed alarm_z={}",
                self.alert_z, self.alarm_z
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            alert_z: self.alert_z,
            alarm_z: self.alarm_z,
        }
    }
}
