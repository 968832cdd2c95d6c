// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::dynamic::DynamicClassifier;
use crate::static_baseline::StaticClassifier;
use std::time::Instant;
use vigil_core::{
    AggregatedPoint, AggregatedSeries, BaselineClassifier, ClassifiedPoint, ClassifiedSeries,
    ClassifierConfig, Diagnostics, VigilError,
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How a series is fanned out across its groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    /// One task per group on the rayon pool; sequential without the `rayon`
    /// feature.
    #[default]
    Parallel,
}

/// Classifies every group of `series`, in parallel when available.
pub fn classify_series<C>(
    classifier: &C,
    series: &AggregatedSeries,
) -> Result<ClassifiedSeries, VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    classify_series_with(classifier, series, ExecutionMode::default())
}

/// Classifies every group of `series` with an explicit execution mode.
///
/// Output is in series order regardless of `mode`.
pub fn classify_series_with<C>(
    classifier: &C,
    series: &AggregatedSeries,
    mode: ExecutionMode,
) -> Result<ClassifiedSeries, VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    classifier.config().validate()?;
    let started_at = Instant::now();
    let groups: Vec<&[AggregatedPoint]> = series.groups().collect();

    let (per_group, used_parallel) = fan_out(classifier, &groups, mode)?;

    let mut diagnostics = Diagnostics::new(classifier.model());
    diagnostics.groups = groups.len();
    let mut points = Vec::with_capacity(series.len());
    for classified in per_group {
        for point in &classified {
            record_point(&mut diagnostics, point);
        }
        points.extend(classified);
    }

    let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
    diagnostics.runtime_ms = Some(runtime_ms);
    diagnostics.thread_count = thread_count(used_parallel);

    tracing::debug!(
        model = %classifier.model(),
        groups = diagnostics.groups,
        points = diagnostics.points,
        flagged = diagnostics.flagged,
        insufficient_window = diagnostics.insufficient_window,
        degenerate_variance = diagnostics.degenerate_variance,
        runtime_ms,
        used_parallel,
        "classified series"
    );

    Ok(ClassifiedSeries {
        model: classifier.model(),
        config: *classifier.config(),
        dimensions: series.dimensions().to_vec(),
        points,
        diagnostics,
    })
}

/// Runs the static and dynamic classifiers over the same series, side by side.
pub fn classify_static_and_dynamic(
    config: ClassifierConfig,
    series: &AggregatedSeries,
) -> Result<(ClassifiedSeries, ClassifiedSeries), VigilError> {
    let static_classifier = StaticClassifier::new(config)?;
    let dynamic_classifier = DynamicClassifier::new(config)?;

    #[cfg(feature = "rayon")]
    let (static_result, dynamic_result) = rayon::join(
        || classify_series(&static_classifier, series),
        || classify_series(&dynamic_classifier, series),
    );

    #[cfg(not(feature = "rayon"))]
    let (static_result, dynamic_result) = (
        classify_series(&static_classifier, series),
        classify_series(&dynamic_classifier, series),
    );

    Ok((static_result?, dynamic_result?))
}

fn record_point(diagnostics: &mut Diagnostics, point: &ClassifiedPoint) {
    diagnostics.points += 1;
    match point.baseline_std_dev {
        None => diagnostics.insufficient_window += 1,
        Some(std_dev) if std_dev == 0.0 => diagnostics.degenerate_variance += 1,
        Some(_) => {}
    }
    if point.status.is_flagged() {
        diagnostics.flagged += 1;
    }
}

fn classify_group_traced<C>(
    classifier: &C,
    group: &[AggregatedPoint],
) -> Result<Vec<ClassifiedPoint>, VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    let out = classifier.classify_group(group)?;
    if let Some(first) = group.first() {
        tracing::trace!(group = %first.group, points = group.len(), "classified group");
    }
    Ok(out)
}

#[cfg(feature = "rayon")]
fn fan_out<C>(
    classifier: &C,
    groups: &[&[AggregatedPoint]],
    mode: ExecutionMode,
) -> Result<(Vec<Vec<ClassifiedPoint>>, bool), VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    if mode == ExecutionMode::Parallel && groups.len() > 1 {
        let per_group = groups
            .par_iter()
            .map(|group| classify_group_traced(classifier, group))
            .collect::<Result<Vec<_>, VigilError>>()?;
        return Ok((per_group, true));
    }
    fan_out_sequential(classifier, groups)
}

#[cfg(not(feature = "rayon"))]
fn fan_out<C>(
    classifier: &C,
    groups: &[&[AggregatedPoint]],
    _mode: ExecutionMode,
) -> Result<(Vec<Vec<ClassifiedPoint>>, bool), VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    fan_out_sequential(classifier, groups)
}

fn fan_out_sequential<C>(
    classifier: &C,
    groups: &[&[AggregatedPoint]],
) -> Result<(Vec<Vec<ClassifiedPoint>>, bool), VigilError>
where
    C: BaselineClassifier + ?Sized,
{
    let per_group = groups
        .iter()
        .map(|group| classify_group_traced(classifier, group))
        .collect::<Result<Vec<_>, VigilError>>()?;
    Ok((per_group, false))
}

#[cfg(feature = "rayon")]
fn thread_count(used_parallel: bool) -> Option<usize> {
    if used_parallel {
        Some(rayon::current_num_threads())
    } else {
        Some(1)
    }
}

#[cfg(not(feature = "rayon"))]
fn thread_count(_used_parallel: bool) -> Option<usize> {
    Some(1)
}
