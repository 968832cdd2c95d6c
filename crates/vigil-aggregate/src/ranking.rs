// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use vigil_core::{AggregatedSeries, Dimension, GroupKey, VigilError};

/// Total observed volume of one group.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupVolume {
    pub group: GroupKey,
    pub total: u64,
    pub periods: usize,
}

/// Every group's total count, largest first, ties by group name.
pub fn group_volumes(series: &AggregatedSeries) -> Vec<GroupVolume> {
    let mut volumes: Vec<GroupVolume> = series
        .groups()
        .filter_map(|points| {
            let first = points.first()?;
            Some(GroupVolume {
                group: first.group.clone(),
                total: points.iter().map(|p| p.count).fold(0u64, u64::saturating_add),
                periods: points.len(),
            })
        })
        .collect();
    volumes.sort_by(|lhs, rhs| {
        rhs.total
            .cmp(&lhs.total)
            .then_with(|| lhs.group.name().cmp(&rhs.group.name()))
    });
    volumes
}

/// Keys of the `n` highest-volume groups.
pub fn top_groups_by_volume(series: &AggregatedSeries, n: usize) -> Vec<GroupKey> {
    group_volumes(series)
        .into_iter()
        .take(n)
        .map(|volume| volume.group)
        .collect()
}

/// True when any value of `group` is the fill placeholder of its dimension.
pub fn is_placeholder_group(dimensions: &[Dimension], group: &GroupKey) -> bool {
    dimensions
        .iter()
        .zip(group.values())
        .any(|(dimension, value)| value == dimension.placeholder())
}

/// Keys of the `n` highest-volume groups, skipping placeholder groups such as
/// `Unknown County`.
pub fn top_reported_groups_by_volume(series: &AggregatedSeries, n: usize) -> Vec<GroupKey> {
    group_volumes(series)
        .into_iter()
        .filter(|volume| !is_placeholder_group(series.dimensions(), &volume.group))
        .take(n)
        .map(|volume| volume.group)
        .collect()
}

/// Restricts `series` to the listed groups; unknown keys are ignored.
pub fn retain_groups(
    series: &AggregatedSeries,
    groups: &[GroupKey],
) -> Result<AggregatedSeries, VigilError> {
    let keep: BTreeSet<&GroupKey> = groups.iter().collect();
    let points = series
        .points()
        .iter()
        .filter(|point| keep.contains(&point.group))
        .cloned()
        .collect();
    AggregatedSeries::from_points(series.dimensions().to_vec(), points)
}
