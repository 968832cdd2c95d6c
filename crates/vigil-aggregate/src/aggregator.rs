// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::filter::RecordFilter;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use vigil_core::{
    AggregatedPoint, AggregatedSeries, Dimension, GroupKey, Period, Record, VigilError,
    parse_timestamp_date, validate_dimensions,
};

/// What to do with a record that lacks a value for a dimension.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MissingDimensionPolicy {
    /// Exclude the record and count it as dropped.
    #[default]
    Drop,
    /// Substitute the dimension's placeholder (`Unknown Region`, ...).
    FillPlaceholder,
}

impl MissingDimensionPolicy {
    fn resolve(self, dimension: Dimension, value: Option<&str>) -> Resolved<'_> {
        match (value, self) {
            (Some(value), _) => Resolved::Present(value),
            (None, MissingDimensionPolicy::Drop) => Resolved::Missing,
            (None, MissingDimensionPolicy::FillPlaceholder) => {
                Resolved::Filled(dimension.placeholder())
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Resolved<'a> {
    Present(&'a str),
    Filled(&'static str),
    Missing,
}

impl<'a> Resolved<'a> {
    fn value(self) -> Option<&'a str> {
        match self {
            Resolved::Present(value) => Some(value),
            Resolved::Filled(value) => Some(value),
            Resolved::Missing => None,
        }
    }
}

/// Grouping selector plus record-level policies for one aggregation run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AggregationOptions {
    pub dimensions: Vec<Dimension>,
    pub missing: MissingDimensionPolicy,
    pub filter: RecordFilter,
}

impl AggregationOptions {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    pub fn with_missing(mut self, missing: MissingDimensionPolicy) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> Result<(), VigilError> {
        validate_dimensions(&self.dimensions)?;
        self.filter.validate()
    }
}

/// Data-quality accounting for one aggregation run.
///
/// `records_seen` always equals `records_aggregated + filtered_out +
/// dropped_unparseable_timestamp + dropped_missing_dimension`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub records_seen: usize,
    pub records_aggregated: usize,
    pub filtered_out: usize,
    pub dropped_unparseable_timestamp: usize,
    pub dropped_missing_dimension: usize,
    /// Aggregated records whose group key used at least one placeholder.
    pub filled_missing_dimension: usize,
    pub groups: usize,
    pub points: usize,
}

impl AggregationReport {
    pub fn dropped(&self) -> usize {
        self.dropped_unparseable_timestamp + self.dropped_missing_dimension
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    pub series: AggregatedSeries,
    pub report: AggregationReport,
}

/// Collapses `records` into one count per observed `(group, month)`.
///
/// Records with unparseable timestamps, or missing a selected dimension under
/// [`MissingDimensionPolicy::Drop`], are excluded and counted in the report.
/// Months without records are not emitted.
pub fn aggregate(
    records: &[Record],
    options: &AggregationOptions,
) -> Result<Aggregation, VigilError> {
    options.validate()?;
    let mut report = AggregationReport::default();
    let mut counts: BTreeMap<(GroupKey, Period), u64> = BTreeMap::new();

    for record in records {
        report.records_seen += 1;

        let date = match record.timestamp.as_deref().map(parse_timestamp_date) {
            Some(Ok(date)) => date,
            Some(Err(_)) | None => {
                report.dropped_unparseable_timestamp += 1;
                continue;
            }
        };

        if !admits(&options.filter, options.missing, record, date) {
            report.filtered_out += 1;
            continue;
        }

        let Some((key, filled)) = group_key(record, &options.dimensions, options.missing) else {
            report.dropped_missing_dimension += 1;
            continue;
        };

        if filled {
            report.filled_missing_dimension += 1;
        }
        report.records_aggregated += 1;
        *counts.entry((key, Period::from_date(date))).or_insert(0) += 1;
    }

    let points: Vec<AggregatedPoint> = counts
        .into_iter()
        .map(|((group, period), count)| AggregatedPoint::new(group, period, count))
        .collect();
    let series = AggregatedSeries::from_points(options.dimensions.clone(), points)?;
    report.groups = series.group_count();
    report.points = series.len();

    if report.dropped() > 0 {
        tracing::warn!(
            dropped_unparseable_timestamp = report.dropped_unparseable_timestamp,
            dropped_missing_dimension = report.dropped_missing_dimension,
            records_seen = report.records_seen,
            "dropped records during aggregation"
        );
    }
    tracing::debug!(
        records_aggregated = report.records_aggregated,
        filtered_out = report.filtered_out,
        filled_missing_dimension = report.filled_missing_dimension,
        groups = report.groups,
        points = report.points,
        "aggregated records"
    );

    Ok(Aggregation { series, report })
}

fn admits(
    filter: &RecordFilter,
    missing: MissingDimensionPolicy,
    record: &Record,
    date: NaiveDate,
) -> bool {
    filter.admits_date(date)
        && filter.admits_sentiment(record.sentiment())
        && Dimension::ALL.iter().all(|&dimension| {
            let resolved = missing.resolve(dimension, record.dimension(dimension));
            filter.admits_value(dimension, resolved.value())
        })
}

fn group_key(
    record: &Record,
    dimensions: &[Dimension],
    missing: MissingDimensionPolicy,
) -> Option<(GroupKey, bool)> {
    let mut filled = false;
    let mut values = Vec::with_capacity(dimensions.len());
    for &dimension in dimensions {
        let resolved = missing.resolve(dimension, record.dimension(dimension));
        if matches!(resolved, Resolved::Filled(_)) {
            filled = true;
        }
        values.push(resolved.value()?.to_string());
    }
    Some((GroupKey::new(values), filled))
}
