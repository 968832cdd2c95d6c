// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Static and dynamic baseline classifiers for grouped count series.

pub mod dynamic;
pub mod engine;
pub mod moments;
pub mod static_baseline;

pub use dynamic::DynamicClassifier;
pub use engine::{ExecutionMode, classify_series, classify_series_with, classify_static_and_dynamic};
pub use moments::ExactMoments;
pub use static_baseline::StaticClassifier;
