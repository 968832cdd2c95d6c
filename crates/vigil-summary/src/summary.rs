// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::collections::BTreeMap;
use vigil_core::{
    ClassifiedPoint, ClassifiedSeries, Dimension, GroupKey, Period, Status, VigilError,
    validate_dimensions,
};

/// Number of points in each status.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub normal: usize,
    pub alert_high: usize,
    pub alarm_high: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Normal => self.normal += 1,
            Status::AlertHigh => self.alert_high += 1,
            Status::AlarmHigh => self.alarm_high += 1,
        }
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Normal => self.normal,
            Status::AlertHigh => self.alert_high,
            Status::AlarmHigh => self.alarm_high,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.alert_high + self.alarm_high
    }

    pub fn flagged(&self) -> usize {
        self.alert_high + self.alarm_high
    }
}

/// Status of a group's most recent period.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatestStatus {
    pub period: Period,
    pub status: Status,
    pub z_score: f64,
    pub count: u64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub group: GroupKey,
    pub name: String,
    pub counts: StatusCounts,
    pub first_period: Period,
    pub last_period: Period,
    pub peak_z: f64,
    pub latest: LatestStatus,
}

impl GroupSummary {
    fn start(group: GroupKey, point: &ClassifiedPoint) -> Self {
        let mut counts = StatusCounts::default();
        counts.record(point.status);
        Self {
            name: group.name(),
            group,
            counts,
            first_period: point.period,
            last_period: point.period,
            peak_z: point.z_score,
            latest: latest_of(point),
        }
    }

    fn absorb(&mut self, point: &ClassifiedPoint) {
        self.counts.record(point.status);
        self.first_period = self.first_period.min(point.period);
        self.last_period = self.last_period.max(point.period);
        if point.z_score > self.peak_z {
            self.peak_z = point.z_score;
        }
        let candidate = latest_of(point);
        if supersedes(&candidate, &self.latest) {
            self.latest = candidate;
        }
    }
}

fn latest_of(point: &ClassifiedPoint) -> LatestStatus {
    LatestStatus {
        period: point.period,
        status: point.status,
        z_score: point.z_score,
        count: point.count,
    }
}

/// Later period wins; within one period (several series folded into one
/// summary group) the more severe status, then the higher z, wins.
fn supersedes(candidate: &LatestStatus, current: &LatestStatus) -> bool {
    candidate
        .period
        .cmp(&current.period)
        .then_with(|| candidate.status.cmp(&current.status))
        .then_with(|| {
            candidate
                .z_score
                .partial_cmp(&current.z_score)
                .unwrap_or(Ordering::Equal)
        })
        == Ordering::Greater
}

/// Ranked display order: most Alarm-high first, then most Alert-high, then
/// group name ascending.
pub fn ranked_order(lhs: &GroupSummary, rhs: &GroupSummary) -> Ordering {
    rhs.counts
        .alarm_high
        .cmp(&lhs.counts.alarm_high)
        .then_with(|| rhs.counts.alert_high.cmp(&lhs.counts.alert_high))
        .then_with(|| lhs.name.cmp(&rhs.name))
}

/// Status counts per group of `series` projected onto `by`, in ranked order.
///
/// `by` must name dimensions the series was grouped by; series groups that
/// agree on those dimensions are folded together. An empty `by` yields one
/// overall summary.
pub fn summarize(
    series: &ClassifiedSeries,
    by: &[Dimension],
) -> Result<Vec<GroupSummary>, VigilError> {
    validate_dimensions(by)?;
    let positions = by
        .iter()
        .map(|dimension| {
            series
                .dimensions
                .iter()
                .position(|candidate| candidate == dimension)
                .ok_or_else(|| {
                    VigilError::invalid_input(format!(
                        "cannot summarize by '{dimension}': series is grouped by [{}]",
                        series
                            .dimensions
                            .iter()
                            .map(|d| d.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<GroupKey, GroupSummary> = BTreeMap::new();
    for point in &series.points {
        let key = point.group.project(&positions)?;
        match groups.get_mut(&key) {
            Some(summary) => summary.absorb(point),
            None => {
                groups.insert(key.clone(), GroupSummary::start(key, point));
            }
        }
    }

    let mut summaries: Vec<GroupSummary> = groups.into_values().collect();
    summaries.sort_by(ranked_order);
    tracing::debug!(
        model = %series.model,
        groups = summaries.len(),
        points = series.points.len(),
        "summarized classified series"
    );
    Ok(summaries)
}

/// Status counts per series group, in ranked order.
pub fn summarize_groups(series: &ClassifiedSeries) -> Result<Vec<GroupSummary>, VigilError> {
    let by = series.dimensions.clone();
    summarize(series, &by)
}

/// The first `n` rows of a ranked table.
pub fn top(mut summaries: Vec<GroupSummary>, n: usize) -> Vec<GroupSummary> {
    summaries.sort_by(ranked_order);
    summaries.truncate(n);
    summaries
}

#[cfg(test)]
mod tests {
    use super::{StatusCounts, summarize, summarize_groups, top};
    use vigil_core::{
        BaselineModel, ClassifiedPoint, ClassifiedSeries, ClassifierConfig, Diagnostics,
        Dimension, GroupKey, Period, Status,
    };

    fn point(group: &[&str], month: u32, status: Status, z_score: f64) -> ClassifiedPoint {
        ClassifiedPoint {
            group: group.iter().copied().collect::<GroupKey>(),
            period: Period::new(2024, month).expect("valid period"),
            count: 1,
            baseline_mean: None,
            baseline_std_dev: None,
            baseline_samples: 0,
            z_score,
            status,
        }
    }

    fn series(dimensions: Vec<Dimension>, mut points: Vec<ClassifiedPoint>) -> ClassifiedSeries {
        points.sort_by(|lhs, rhs| {
            lhs.group
                .cmp(&rhs.group)
                .then_with(|| lhs.period.cmp(&rhs.period))
        });
        ClassifiedSeries {
            model: BaselineModel::Dynamic,
            config: ClassifierConfig::default(),
            dimensions,
            points,
            diagnostics: Diagnostics::new(BaselineModel::Dynamic),
        }
    }

    fn regional() -> ClassifiedSeries {
        series(
            vec![Dimension::Region],
            vec![
                point(&["Lakes"], 1, Status::AlarmHigh, 2.5),
                point(&["Lakes"], 2, Status::Normal, 0.0),
                point(&["Abyei"], 1, Status::AlarmHigh, 3.0),
                point(&["Abyei"], 2, Status::AlertHigh, 1.2),
                point(&["Unity"], 1, Status::AlarmHigh, 2.1),
                point(&["Unity"], 2, Status::Normal, -0.4),
                point(&["Warrap"], 1, Status::AlertHigh, 1.0),
                point(&["Warrap"], 2, Status::AlertHigh, 1.9),
            ],
        )
    }

    fn names(summaries: &[super::GroupSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn status_counts_track_each_status() {
        let mut counts = StatusCounts::default();
        for status in [Status::Normal, Status::AlarmHigh, Status::AlarmHigh, Status::AlertHigh] {
            counts.record(status);
        }
        assert_eq!(counts.get(Status::AlarmHigh), 2);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.flagged(), 3);
    }

    #[test]
    fn ranking_uses_alarm_then_alert_then_name() {
        let summaries = summarize_groups(&regional()).expect("summarize");
        assert_eq!(names(&summaries), vec!["Abyei", "Lakes", "Unity", "Warrap"]);
    }

    #[test]
    fn summary_tracks_span_peak_and_latest() {
        let summaries = summarize_groups(&regional()).expect("summarize");
        let abyei = &summaries[0];
        assert_eq!(abyei.counts.alarm_high, 1);
        assert_eq!(abyei.counts.alert_high, 1);
        assert_eq!(abyei.first_period, Period::new(2024, 1).expect("valid"));
        assert_eq!(abyei.last_period, Period::new(2024, 2).expect("valid"));
        assert_eq!(abyei.peak_z, 3.0);
        assert_eq!(abyei.latest.status, Status::AlertHigh);
        assert_eq!(abyei.latest.period, Period::new(2024, 2).expect("valid"));
    }

    #[test]
    fn projection_folds_series_groups() {
        let input = series(
            vec![Dimension::Region, Dimension::Label],
            vec![
                point(&["Jonglei", "Flooding"], 1, Status::AlarmHigh, 2.2),
                point(&["Jonglei", "Conflict"], 1, Status::Normal, 0.1),
                point(&["Jonglei", "Conflict"], 3, Status::AlertHigh, 1.1),
                point(&["Unity", "Flooding"], 3, Status::Normal, 0.0),
            ],
        );
        let by_label = summarize(&input, &[Dimension::Label]).expect("summarize");
        assert_eq!(names(&by_label), vec!["Flooding", "Conflict"]);
        let flooding = &by_label[0];
        assert_eq!(flooding.counts.total(), 2);
        assert_eq!(flooding.latest.period, Period::new(2024, 3).expect("valid"));

        let overall = summarize(&input, &[]).expect("summarize");
        assert_eq!(overall.len(), 1);
        assert_eq!(overall[0].name, "All");
        assert_eq!(overall[0].counts.total(), 4);
        // March holds two folded series; the more severe status wins.
        assert_eq!(overall[0].latest.status, Status::AlertHigh);
    }

    #[test]
    fn summarizing_by_an_absent_dimension_is_rejected() {
        let err = summarize(&regional(), &[Dimension::Label]).expect_err("label not grouped");
        assert_eq!(err.code(), "invalid_input");
        assert!(summarize(&regional(), &[Dimension::Region, Dimension::Region]).is_err());
    }

    #[test]
    fn top_truncates_ranked_table() {
        let summaries = summarize_groups(&regional()).expect("summarize");
        assert_eq!(names(&top(summaries.clone(), 2)), vec!["Abyei", "Lakes"]);
        assert_eq!(top(summaries, 10).len(), 4);
    }

    #[test]
    fn empty_series_has_no_rows() {
        let empty = series(vec![Dimension::Region], Vec::new());
        assert!(summarize_groups(&empty).expect("summarize").is_empty());
    }
}
