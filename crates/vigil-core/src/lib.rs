// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core shared types and the classifier contract for vigil.

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod period;
pub mod record;
pub mod series;
pub mod status;

pub use classifier::{BaselineClassifier, validate_group_points};
pub use config::{
    ClassifierConfig, DEFAULT_ALARM_Z, DEFAULT_ALERT_Z, DEFAULT_MIN_WINDOW_SAMPLES,
    DEFAULT_WINDOW_PERIODS, Thresholds,
};
pub use diagnostics::{DIAGNOSTICS_SCHEMA_VERSION, Diagnostics};
pub use error::VigilError;
pub use period::{Period, parse_timestamp_date};
pub use record::{Dimension, GroupKey, Record};
pub use series::{
    AggregatedPoint, AggregatedSeries, Baseline, BaselineModel, ClassifiedPoint,
    ClassifiedSeries, classify_z, validate_dimensions, z_score,
};
pub use status::Status;
