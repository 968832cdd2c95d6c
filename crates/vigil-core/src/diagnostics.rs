// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::series::BaselineModel;

/// Diagnostics schema version for classification run metadata.
pub const DIAGNOSTICS_SCHEMA_VERSION: u32 = 1;

/// Structured diagnostics captured from one classifier run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostics {
    pub model: BaselineModel,
    pub groups: usize,
    pub points: usize,
    /// Points left Normal because the trailing window held too few samples.
    pub insufficient_window: usize,
    /// Points left Normal because their baseline had zero variance.
    pub degenerate_variance: usize,
    pub flagged: usize,
    pub schema_version: u32,
    pub engine_version: Option<String>,
    pub runtime_ms: Option<u64>,
    pub thread_count: Option<usize>,
}

impl Diagnostics {
    pub fn new(model: BaselineModel) -> Self {
        Self {
            model,
            groups: 0,
            points: 0,
            insufficient_window: 0,
            degenerate_variance: 0,
            flagged: 0,
            schema_version: DIAGNOSTICS_SCHEMA_VERSION,
            engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            runtime_ms: None,
            thread_count: None,
        }
    }
}
