// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use std::collections::BTreeSet;
use vigil_core::{Dimension, VigilError};

/// Record selection applied before grouping.
///
/// Date bounds are inclusive. An empty allow-list admits every value; a
/// non-empty one admits only records whose (resolved) value it contains, so
/// a record missing that dimension is rejected. The sentiment allow-list
/// works the same way on [`Record::sentiment`](vigil_core::Record::sentiment).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sources: BTreeSet<String>,
    pub labels: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub sub_regions: BTreeSet<String>,
    pub sentiments: BTreeSet<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Adds `values` to the allow-list of `dimension`.
    pub fn allowing<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list_mut(dimension)
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds `values` to the sentiment allow-list.
    pub fn with_sentiments<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sentiments.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn allow_list(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Region => &self.regions,
            Dimension::SubRegion => &self.sub_regions,
            Dimension::Label => &self.labels,
            Dimension::Source => &self.sources,
        }
    }

    fn allow_list_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Region => &mut self.regions,
            Dimension::SubRegion => &mut self.sub_regions,
            Dimension::Label => &mut self.labels,
            Dimension::Source => &mut self.sources,
        }
    }

    /// True when the filter admits every record.
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.sentiments.is_empty()
            && Dimension::ALL
                .iter()
                .all(|&dimension| self.allow_list(dimension).is_empty())
    }

    pub fn validate(&self) -> Result<(), VigilError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(VigilError::invalid_input(format!(
                "filter date range is empty: from {from} is after to {to}"
            ))),
            _ => Ok(()),
        }
    }

    pub fn admits_date(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn admits_sentiment(&self, sentiment: Option<&str>) -> bool {
        self.sentiments.is_empty()
            || sentiment.is_some_and(|sentiment| self.sentiments.contains(sentiment))
    }

    pub fn admits_value(&self, dimension: Dimension, value: Option<&str>) -> bool {
        let allowed = self.allow_list(dimension);
        if allowed.is_empty() {
            return true;
        }
        value.is_some_and(|value| allowed.contains(value))
    }
}
