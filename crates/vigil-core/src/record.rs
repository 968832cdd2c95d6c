// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::VigilError;
use std::fmt;
use std::str::FromStr;

/// Categorical attribute a series can be grouped by.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// First-level administrative region.
    Region,
    /// Second-level administrative unit (county).
    SubRegion,
    /// Topical label assigned upstream.
    Label,
    /// Publishing source.
    Source,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Region,
        Dimension::SubRegion,
        Dimension::Label,
        Dimension::Source,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::SubRegion => "sub_region",
            Self::Label => "label",
            Self::Source => "source",
        }
    }

    /// Value substituted for a missing attribute under the fill policy.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Region => "Unknown Region",
            Self::SubRegion => "Unknown County",
            Self::Label => "Uncategorized",
            Self::Source => "Unknown Source",
        }
    }

    /// Parses a comma-separated selector such as `region,label`.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, VigilError> {
        let mut dimensions = Vec::new();
        for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            dimensions.push(token.parse()?);
        }
        Ok(dimensions)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = VigilError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "region" | "adm1" => Ok(Self::Region),
            "sub_region" | "subregion" | "sub-region" | "county" | "adm2" => Ok(Self::SubRegion),
            "label" => Ok(Self::Label),
            "source" => Ok(Self::Source),
            _ => Err(VigilError::invalid_input(format!(
                "unknown dimension '{raw}'; expected one of: region, sub_region, label, source"
            ))),
        }
    }
}

/// One ingested document observation.
///
/// Fields are kept raw: timestamps are parsed and blank values treated as
/// missing only when the record is aggregated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    #[cfg_attr(feature = "serde", serde(default, alias = "date"))]
    pub timestamp: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "adm1_name_final"))]
    pub region: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "adm2_name_final"))]
    pub sub_region: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "Label"))]
    pub label: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "retrieve_source"))]
    pub source: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sentiment_score: Option<f64>,
    /// Sentiment class such as `Negative`; used for filtering, never grouping.
    #[cfg_attr(feature = "serde", serde(default, alias = "sentiment"))]
    pub sentiment_label: Option<String>,
}

impl Record {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    pub fn with_sub_region(mut self, value: impl Into<String>) -> Self {
        self.sub_region = Some(value.into());
        self
    }

    pub fn with_label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }

    pub fn with_source(mut self, value: impl Into<String>) -> Self {
        self.source = Some(value.into());
        self
    }

    pub fn with_sentiment_score(mut self, value: f64) -> Self {
        self.sentiment_score = Some(value);
        self
    }

    pub fn with_sentiment_label(mut self, value: impl Into<String>) -> Self {
        self.sentiment_label = Some(value.into());
        self
    }

    /// Trimmed sentiment label, `None` when absent or blank.
    pub fn sentiment(&self) -> Option<&str> {
        self.sentiment_label
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Trimmed dimension value, `None` when absent or blank.
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        let raw = match dimension {
            Dimension::Region => self.region.as_deref(),
            Dimension::SubRegion => self.sub_region.as_deref(),
            Dimension::Label => self.label.as_deref(),
            Dimension::Source => self.source.as_deref(),
        };
        raw.map(str::trim).filter(|value| !value.is_empty())
    }
}

/// Ordered tuple of dimension values identifying one series.
///
/// Keys compare lexicographically value by value, which is also the group
/// order of every aggregated and classified series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Key of the single overall series produced by an empty selector.
    pub fn overall() -> Self {
        Self(Vec::new())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable name used for display and name tie-breaks.
    pub fn name(&self) -> String {
        if self.0.is_empty() {
            return "All".to_string();
        }
        self.0.join(" / ")
    }

    /// Restricts the key to the given positions, in the given order.
    pub fn project(&self, positions: &[usize]) -> Result<Self, VigilError> {
        positions
            .iter()
            .map(|&idx| {
                self.0.get(idx).cloned().ok_or_else(|| {
                    VigilError::invalid_input(format!(
                        "group key position {idx} out of range for key of length {}",
                        self.0.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<S: Into<String>> FromIterator<S> for GroupKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Dimension, GroupKey, Record};

    #[test]
    fn dimension_lookup_trims_and_treats_blank_as_missing() {
        let record = Record::new("2024-01-02")
            .with_region("  Jonglei ")
            .with_label("   ")
            .with_source("radio");
        assert_eq!(record.dimension(Dimension::Region), Some("Jonglei"));
        assert_eq!(record.dimension(Dimension::Label), None);
        assert_eq!(record.dimension(Dimension::SubRegion), None);
        assert_eq!(record.dimension(Dimension::Source), Some("radio"));
    }

    #[test]
    fn sentiment_lookup_trims_and_treats_blank_as_missing() {
        let record = Record::new("2024-01-02").with_sentiment_label(" Negative ");
        assert_eq!(record.sentiment(), Some("Negative"));
        assert_eq!(Record::new("2024-01-02").with_sentiment_label("  ").sentiment(), None);
        assert_eq!(Record::new("2024-01-02").sentiment(), None);
    }

    #[test]
    fn dimension_parse_accepts_aliases_and_rejects_unknown() {
        assert_eq!(
            Dimension::parse_list("region, county ,label").expect("parse"),
            vec![Dimension::Region, Dimension::SubRegion, Dimension::Label]
        );
        assert_eq!(Dimension::parse_list("").expect("parse"), vec![]);
        let err = Dimension::parse_list("region,weather").expect_err("unknown dimension");
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn group_keys_order_lexicographically_and_project() {
        let a: GroupKey = ["Jonglei", "Food Crisis"].into_iter().collect();
        let b: GroupKey = ["Jonglei", "Conflict and Violence"].into_iter().collect();
        let c: GroupKey = ["Central Equatoria", "Food Crisis"].into_iter().collect();
        let mut keys = vec![a.clone(), b.clone(), c.clone()];
        keys.sort();
        assert_eq!(keys, vec![c, b, a.clone()]);

        assert_eq!(a.name(), "Jonglei / Food Crisis");
        assert_eq!(a.project(&[1]).expect("project").name(), "Food Crisis");
        assert!(a.project(&[2]).is_err());
        assert_eq!(GroupKey::overall().name(), "All");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_deserializes_from_source_dataset_columns() {
        let raw = r#"{
            "date": "2024-02-11",
            "adm1_name_final": "Jonglei",
            "adm2_name_final": "Bor South",
            "Label": "Food Crisis",
            "retrieve_source": "Radio Tamazuj",
            "sentiment_score": -0.4,
            "title": "ignored"
        }"#;
        let record: Record = serde_json::from_str(raw).expect("record should deserialize");
        assert_eq!(record.timestamp.as_deref(), Some("2024-02-11"));
        assert_eq!(record.dimension(Dimension::SubRegion), Some("Bor South"));
        assert_eq!(record.dimension(Dimension::Source), Some("Radio Tamazuj"));
        assert_eq!(record.sentiment_score, Some(-0.4));
    }
}
