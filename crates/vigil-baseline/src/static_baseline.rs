// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::moments::ExactMoments;
use vigil_core::{
    AggregatedPoint, BaselineClassifier, BaselineModel, ClassifiedPoint, ClassifierConfig,
    VigilError, validate_group_points,
};

/// Full-span baseline: one mean/std per group over every observed period.
///
/// Each point is judged against statistics that include later periods, so
/// the result is stable and reproducible but not causal.
#[derive(Clone, Debug)]
pub struct StaticClassifier {
    config: ClassifierConfig,
}

impl StaticClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, VigilError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl BaselineClassifier for StaticClassifier {
    fn model(&self) -> BaselineModel {
        BaselineModel::Static
    }

    fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn classify_group(
        &self,
        points: &[AggregatedPoint],
    ) -> Result<Vec<ClassifiedPoint>, VigilError> {
        validate_group_points(points)?;
        let baseline = ExactMoments::from_counts(points.iter().map(|p| p.count))?.baseline()?;
        let thresholds = self.config.thresholds();
        Ok(points
            .iter()
            .map(|point| ClassifiedPoint::new(point, baseline, &thresholds))
            .collect())
    }
}
