// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::CliError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use vigil_core::ClassifierConfig;

/// Flag values that take precedence over the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub window_periods: Option<usize>,
    pub min_window_samples: Option<usize>,
    pub alert_z: Option<f64>,
    pub alarm_z: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: ClassifierConfig) -> ClassifierConfig {
        if let Some(value) = self.window_periods {
            config.window_periods = value;
        }
        if let Some(value) = self.min_window_samples {
            config.min_window_samples = value;
        }
        if let Some(value) = self.alert_z {
            config.alert_z = value;
        }
        if let Some(value) = self.alarm_z {
            config.alarm_z = value;
        }
        config
    }
}

/// Defaults, then the optional config file, then flag overrides; the result
/// is validated.
pub fn resolve_classifier_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ClassifierConfig, CliError> {
    let base = match path {
        Some(path) => load_classifier_config(path)?,
        None => ClassifierConfig::default(),
    };
    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

pub fn load_classifier_config(path: &Path) -> Result<ClassifierConfig, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CliError::io(format!("failed to read '{}'", path.display()), source))?;
    parse_classifier_config(&raw)
}

/// Parses a JSON config object field by field.
///
/// Accepts snake_case and camelCase keys; unset fields keep their defaults.
pub fn parse_classifier_config(raw: &str) -> Result<ClassifierConfig, CliError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|source| CliError::json("failed to parse classifier config", source))?;
    let dict = expect_object(&value, "classifier config")?;

    let mut config = ClassifierConfig::default();
    for (key, value) in dict {
        match key.as_str() {
            "window_periods" | "windowPeriods" => {
                config.window_periods = parse_usize(value, "config.window_periods")?
            }
            "min_window_samples" | "minWindowSamples" => {
                config.min_window_samples = parse_usize(value, "config.min_window_samples")?
            }
            "alert_z" | "alertZ" => config.alert_z = parse_f64(value, "config.alert_z")?,
            "alarm_z" | "alarmZ" => config.alarm_z = parse_f64(value, "config.alarm_z")?,
            _ => {
                return Err(CliError::invalid_config(format!(
                    "unsupported key '{key}' in classifier config; expected window_periods, \
                     min_window_samples, alert_z or alarm_z"
                )));
            }
        }
    }
    Ok(config)
}

fn expect_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, CliError> {
    value
        .as_object()
        .ok_or_else(|| CliError::invalid_config(format!("{context} must be a JSON object")))
}

fn parse_usize(value: &Value, context: &str) -> Result<usize, CliError> {
    let as_u64 = value.as_u64().ok_or_else(|| {
        CliError::invalid_config(format!("{context} must be a non-negative integer; got {value}"))
    })?;
    usize::try_from(as_u64).map_err(|_| {
        CliError::invalid_config(format!(
            "{context} value {as_u64} does not fit in usize on this platform"
        ))
    })
}

fn parse_f64(value: &Value, context: &str) -> Result<f64, CliError> {
    value
        .as_f64()
        .ok_or_else(|| CliError::invalid_config(format!("{context} must be a number; got {value}")))
}
