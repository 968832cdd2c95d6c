// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::ClassifierConfig;
use crate::series::{AggregatedPoint, BaselineModel, ClassifiedPoint};
use crate::VigilError;

/// Baseline classifier contract: one group's sorted points in, one
/// classified point per input point out.
///
/// Implementations must be pure: the output for a group depends only on that
/// group's points and the configuration.
pub trait BaselineClassifier: Send + Sync {
    fn model(&self) -> BaselineModel;

    fn config(&self) -> &ClassifierConfig;

    fn classify_group(
        &self,
        points: &[AggregatedPoint],
    ) -> Result<Vec<ClassifiedPoint>, VigilError>;
}

/// Checks that `points` form a single group in strictly increasing period
/// order.
pub fn validate_group_points(points: &[AggregatedPoint]) -> Result<(), VigilError> {
    for pair in points.windows(2) {
        if pair[0].group != pair[1].group {
            return Err(VigilError::invalid_input(format!(
                "classify_group received mixed groups '{}' and '{}'",
                pair[0].group, pair[1].group
            )));
        }
        if pair[0].period >= pair[1].period {
            return Err(VigilError::invalid_input(format!(
                "group '{}' periods must be strictly increasing; got {} then {}",
                pair[0].group, pair[0].period, pair[1].period
            )));
        }
    }
    Ok(())
}
