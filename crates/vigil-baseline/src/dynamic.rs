// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::moments::ExactMoments;
use vigil_core::{
    AggregatedPoint, BaselineClassifier, BaselineModel, ClassifiedPoint, ClassifierConfig,
    VigilError, validate_group_points,
};

/// Trailing-window baseline: each point at period `t` is judged only against
/// the group's points in `[t - window_periods, t)`.
///
/// Windows with fewer than `min_window_samples` points leave the baseline
/// undefined and the point Normal. Missing periods are not zero-filled, so a
/// window may hold fewer points than it spans months.
#[derive(Clone, Debug)]
pub struct DynamicClassifier {
    config: ClassifierConfig,
    window: i64,
}

impl DynamicClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, VigilError> {
        config.validate()?;
        let window = i64::try_from(config.window_periods).map_err(|_| {
            VigilError::invalid_config(format!(
                "window_periods does not fit in a period offset; got {}",
                config.window_periods
            ))
        })?;
        Ok(Self { config, window })
    }

    /// Window bounds for the point at `idx`: the half-open index range of
    /// `points` that falls inside its trailing window.
    pub fn window_bounds(&self, points: &[AggregatedPoint], idx: usize) -> (usize, usize) {
        let Some(current) = points.get(idx) else {
            return (points.len(), points.len());
        };
        let start = current.period.index().saturating_sub(self.window);
        let left = points[..idx].partition_point(|p| p.period.index() < start);
        (left, idx)
    }
}

impl BaselineClassifier for DynamicClassifier {
    fn model(&self) -> BaselineModel {
        BaselineModel::Dynamic
    }

    fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn classify_group(
        &self,
        points: &[AggregatedPoint],
    ) -> Result<Vec<ClassifiedPoint>, VigilError> {
        validate_group_points(points)?;
        let thresholds = self.config.thresholds();
        let mut out = Vec::with_capacity(points.len());
        let mut moments = ExactMoments::new();
        let mut left = 0usize;

        for (idx, point) in points.iter().enumerate() {
            let start = point.period.index().saturating_sub(self.window);
            while left < idx && points[left].period.index() < start {
                moments.pop(points[left].count)?;
                left += 1;
            }

            let baseline = if moments.len() >= self.config.min_window_samples {
                moments.baseline()?
            } else {
                None
            };
            out.push(ClassifiedPoint::new(point, baseline, &thresholds));

            moments.push(point.count)?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicClassifier;
    use vigil_core::{
        AggregatedPoint, BaselineClassifier, ClassifierConfig, GroupKey, Period, Status,
    };

    fn key() -> GroupKey {
        ["Jonglei"].into_iter().collect()
    }

    fn at(year: i32, month: u32, count: u64) -> AggregatedPoint {
        AggregatedPoint::new(key(), Period::new(year, month).expect("valid period"), count)
    }

    fn consecutive(counts: &[u64]) -> Vec<AggregatedPoint> {
        let start = Period::new(2023, 1).expect("valid period");
        counts
            .iter()
            .enumerate()
            .map(|(idx, &count)| {
                AggregatedPoint::new(key(), start.offset(idx as i64).expect("offset"), count)
            })
            .collect()
    }

    fn classifier() -> DynamicClassifier {
        DynamicClassifier::new(ClassifierConfig::default()).expect("default config is valid")
    }

    #[test]
    fn new_rejects_zero_window() {
        let err = DynamicClassifier::new(ClassifierConfig {
            window_periods: 0,
            ..ClassifierConfig::default()
        })
        .expect_err("zero window must be rejected");
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn first_points_are_suppressed_until_window_fills() {
        let out = classifier()
            .classify_group(&consecutive(&[1, 1_000, 1_000_000, 4, 4]))
            .expect("classify");
        assert!(out[..3].iter().all(|p| p.status == Status::Normal));
        assert!(out[..3].iter().all(|p| p.baseline_mean.is_none()));
        assert_eq!(out[3].baseline_samples, 3);
    }

    #[test]
    fn window_is_half_open_and_excludes_current_period() {
        let out = classifier()
            .classify_group(&consecutive(&[8, 12, 8, 12, 12]))
            .expect("classify");
        let last = &out[4];
        assert_eq!(last.baseline_mean, Some(10.0));
        assert_eq!(last.baseline_std_dev, Some(2.0));
        assert_eq!(last.z_score, 1.0);
        assert_eq!(last.status, Status::AlertHigh);
    }

    #[test]
    fn points_older_than_window_leave_it() {
        let config = ClassifierConfig {
            window_periods: 3,
            ..ClassifierConfig::default()
        };
        let classifier = DynamicClassifier::new(config).expect("valid config");
        let out = classifier
            .classify_group(&consecutive(&[100, 5, 5, 5, 5]))
            .expect("classify");
        // At month 5 the window [2, 5) holds only the three 5s.
        assert_eq!(out[4].baseline_mean, Some(5.0));
        assert_eq!(out[4].baseline_std_dev, Some(0.0));
        assert_eq!(out[4].status, Status::Normal);
    }

    #[test]
    fn gaps_shrink_the_window_instead_of_zero_filling() {
        let points = vec![
            at(2022, 1, 10),
            at(2022, 2, 10),
            at(2022, 3, 10),
            at(2023, 6, 50),
        ];
        let out = classifier().classify_group(&points).expect("classify");
        assert!(out[3].baseline_mean.is_none());
        assert_eq!(out[3].baseline_samples, 0);
        assert_eq!(out[3].status, Status::Normal);
    }

    #[test]
    fn window_bounds_match_scan() {
        let classifier = DynamicClassifier::new(ClassifierConfig {
            window_periods: 2,
            ..ClassifierConfig::default()
        })
        .expect("valid config");
        let points = consecutive(&[1, 2, 3, 4]);
        assert_eq!(classifier.window_bounds(&points, 0), (0, 0));
        assert_eq!(classifier.window_bounds(&points, 3), (1, 3));
        assert_eq!(classifier.window_bounds(&points, 9), (4, 4));
    }

    #[test]
    fn duplicate_periods_are_rejected() {
        let points = vec![at(2024, 1, 1), at(2024, 1, 2)];
        assert!(classifier().classify_group(&points).is_err());
    }
}
