// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::{ClassifierConfig, Thresholds};
use crate::diagnostics::Diagnostics;
use crate::record::{Dimension, GroupKey};
use crate::status::Status;
use crate::{Period, VigilError};
use std::fmt;

/// Observed record count for one group in one period.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregatedPoint {
    pub group: GroupKey,
    pub period: Period,
    pub count: u64,
}

impl AggregatedPoint {
    pub fn new(group: GroupKey, period: Period, count: u64) -> Self {
        Self {
            group,
            period,
            count,
        }
    }
}

/// Rejects selectors that name the same dimension twice.
pub fn validate_dimensions(dimensions: &[Dimension]) -> Result<(), VigilError> {
    for (idx, dimension) in dimensions.iter().enumerate() {
        if dimensions[..idx].contains(dimension) {
            return Err(VigilError::invalid_input(format!(
                "dimension '{dimension}' is selected more than once"
            )));
        }
    }
    Ok(())
}

/// Sparse grouped count series.
///
/// Points are sorted by group, then period, with at most one point per
/// `(group, period)`. Periods without records are absent, never zero-filled.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedSeries {
    dimensions: Vec<Dimension>,
    points: Vec<AggregatedPoint>,
}

impl AggregatedSeries {
    /// Sorts points into canonical order and validates the series invariants.
    pub fn from_points(
        dimensions: Vec<Dimension>,
        mut points: Vec<AggregatedPoint>,
    ) -> Result<Self, VigilError> {
        validate_dimensions(&dimensions)?;
        if let Some(point) = points.iter().find(|p| p.group.len() != dimensions.len()) {
            return Err(VigilError::invalid_input(format!(
                "group key '{}' has {} values but the series is grouped by {} dimensions",
                point.group,
                point.group.len(),
                dimensions.len()
            )));
        }

        points.sort_by(|lhs, rhs| {
            lhs.group
                .cmp(&rhs.group)
                .then_with(|| lhs.period.cmp(&rhs.period))
        });

        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[0].group == pair[1].group && pair[0].period == pair[1].period)
        {
            return Err(VigilError::invalid_input(format!(
                "duplicate point for group '{}' at period {}",
                pair[0].group, pair[0].period
            )));
        }

        Ok(Self { dimensions, points })
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn points(&self) -> &[AggregatedPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<AggregatedPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Per-group slices in group order.
    pub fn groups(&self) -> impl Iterator<Item = &[AggregatedPoint]> + '_ {
        self.points.chunk_by(|lhs, rhs| lhs.group == rhs.group)
    }

    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    /// Points of a single group, empty if the group is absent.
    pub fn group(&self, key: &GroupKey) -> &[AggregatedPoint] {
        let start = self.points.partition_point(|p| p.group < *key);
        let end = self.points.partition_point(|p| p.group <= *key);
        &self.points[start..end]
    }
}

/// Which baseline a classified series was judged against.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaselineModel {
    /// One mean/std per group over its full span.
    Static,
    /// Per-point mean/std over a trailing window of strictly earlier periods.
    Dynamic,
}

impl BaselineModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for BaselineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean and population standard deviation of a set of counts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    pub mean: f64,
    pub std_dev: f64,
    pub samples: usize,
}

/// Aggregated point with its baseline statistics and status.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedPoint {
    pub group: GroupKey,
    pub period: Period,
    pub count: u64,
    /// `None` when too few earlier observations exist (dynamic model only).
    pub baseline_mean: Option<f64>,
    pub baseline_std_dev: Option<f64>,
    pub baseline_samples: usize,
    /// Always defined; `0.0` when the baseline is undefined or degenerate.
    pub z_score: f64,
    pub status: Status,
}

impl ClassifiedPoint {
    pub fn new(point: &AggregatedPoint, baseline: Option<Baseline>, thresholds: &Thresholds) -> Self {
        let z_score = z_score(point.count as f64, baseline);
        Self {
            group: point.group.clone(),
            period: point.period,
            count: point.count,
            baseline_mean: baseline.map(|b| b.mean),
            baseline_std_dev: baseline.map(|b| b.std_dev),
            baseline_samples: baseline.map_or(0, |b| b.samples),
            z_score,
            status: classify_z(z_score, thresholds),
        }
    }

    pub fn baseline(&self) -> Option<Baseline> {
        match (self.baseline_mean, self.baseline_std_dev) {
            (Some(mean), Some(std_dev)) => Some(Baseline {
                mean,
                std_dev,
                samples: self.baseline_samples,
            }),
            _ => None,
        }
    }

    /// Count at which this point would have become Alert-high.
    pub fn alert_threshold(&self, thresholds: &Thresholds) -> Option<f64> {
        self.baseline()
            .map(|b| b.mean + thresholds.alert_z * b.std_dev)
    }

    /// Count at which this point would have become Alarm-high.
    pub fn alarm_threshold(&self, thresholds: &Thresholds) -> Option<f64> {
        self.baseline()
            .map(|b| b.mean + thresholds.alarm_z * b.std_dev)
    }
}

/// Standard score of `count` against `baseline`.
///
/// Degenerate or undefined baselines score `0.0` so they never raise flags.
pub fn z_score(count: f64, baseline: Option<Baseline>) -> f64 {
    let Some(baseline) = baseline else {
        return 0.0;
    };
    if !baseline.std_dev.is_finite() || baseline.std_dev <= 0.0 || !baseline.mean.is_finite() {
        return 0.0;
    }
    let z = (count - baseline.mean) / baseline.std_dev;
    if z.is_finite() { z } else { 0.0 }
}

/// Maps a z-score to a status; both thresholds are inclusive.
pub fn classify_z(z: f64, thresholds: &Thresholds) -> Status {
    if z >= thresholds.alarm_z {
        Status::AlarmHigh
    } else if z >= thresholds.alert_z {
        Status::AlertHigh
    } else {
        Status::Normal
    }
}

/// Output of one classifier run over a whole aggregated series.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedSeries {
    pub model: BaselineModel,
    pub config: ClassifierConfig,
    pub dimensions: Vec<Dimension>,
    pub points: Vec<ClassifiedPoint>,
    pub diagnostics: Diagnostics,
}

impl ClassifiedSeries {
    pub fn groups(&self) -> impl Iterator<Item = &[ClassifiedPoint]> + '_ {
        self.points.chunk_by(|lhs, rhs| lhs.group == rhs.group)
    }

    pub fn group(&self, key: &GroupKey) -> &[ClassifiedPoint] {
        let start = self.points.partition_point(|p| p.group < *key);
        let end = self.points.partition_point(|p| p.group <= *key);
        &self.points[start..end]
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.points.iter().map(|p| p.status).collect()
    }
}
