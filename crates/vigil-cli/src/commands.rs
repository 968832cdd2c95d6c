// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::args::{
    AggregateArgs, ClassifierArgs, ClassifyArgs, Command, InputArgs, ModelArg, ModelSelection,
    SummarizeArgs,
};
use crate::config::resolve_classifier_config;
use crate::error::CliError;
use crate::input::load_records;
use serde::Serialize;
use vigil_aggregate::{
    Aggregation, AggregationOptions, AggregationReport, MissingDimensionPolicy, RecordFilter,
    aggregate, retain_groups, top_groups_by_volume, top_reported_groups_by_volume,
};
use vigil_baseline::{
    DynamicClassifier, StaticClassifier, classify_series, classify_static_and_dynamic,
};
use vigil_core::{
    AggregatedPoint, AggregatedSeries, BaselineModel, ClassifiedSeries, ClassifierConfig,
    Dimension,
};
use vigil_summary::{DivergenceReport, GroupSummary, divergences, summarize, top};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Aggregate(AggregateOutput),
    Classify(ClassifyOutput),
    Summarize(SummarizeOutput),
}

#[derive(Debug, Serialize)]
pub struct AggregateOutput {
    pub report: AggregationReport,
    pub dimensions: Vec<Dimension>,
    pub points: Vec<AggregatedPoint>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyOutput {
    pub report: AggregationReport,
    pub dimensions: Vec<Dimension>,
    #[serde(rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_series: Option<ClassifiedSeries>,
    #[serde(rename = "dynamic", skip_serializing_if = "Option::is_none")]
    pub dynamic_series: Option<ClassifiedSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divergences: Option<DivergenceReport>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeOutput {
    pub model: BaselineModel,
    pub config: ClassifierConfig,
    pub report: AggregationReport,
    pub summary_by: Vec<Dimension>,
    pub rows: Vec<GroupSummary>,
}

pub fn run(command: &Command) -> Result<Output, CliError> {
    match command {
        Command::Aggregate(args) => run_aggregate(args).map(Output::Aggregate),
        Command::Classify(args) => run_classify(args).map(Output::Classify),
        Command::Summarize(args) => run_summarize(args).map(Output::Summarize),
    }
}

pub fn run_aggregate(args: &AggregateArgs) -> Result<AggregateOutput, CliError> {
    let Aggregation { series, report } = load_and_aggregate(&args.input)?;
    Ok(AggregateOutput {
        report,
        dimensions: series.dimensions().to_vec(),
        points: series.into_points(),
    })
}

pub fn run_classify(args: &ClassifyArgs) -> Result<ClassifyOutput, CliError> {
    let config = classifier_config(&args.classifier)?;
    let Aggregation { series, report } = load_and_aggregate(&args.input)?;
    let series = restrict_to_top(series, args.top, args.rank_placeholders)?;

    let (static_series, dynamic_series, divergence_report) = match args.model {
        ModelSelection::Static => {
            let classifier = StaticClassifier::new(config)?;
            (Some(classify_series(&classifier, &series)?), None, None)
        }
        ModelSelection::Dynamic => {
            let classifier = DynamicClassifier::new(config)?;
            (None, Some(classify_series(&classifier, &series)?), None)
        }
        ModelSelection::Both => {
            let (static_out, dynamic_out) = classify_static_and_dynamic(config, &series)?;
            let comparison = divergences(&static_out, &dynamic_out)?;
            (Some(static_out), Some(dynamic_out), Some(comparison))
        }
    };

    Ok(ClassifyOutput {
        report,
        dimensions: series.dimensions().to_vec(),
        static_series,
        dynamic_series,
        divergences: divergence_report,
    })
}

pub fn run_summarize(args: &SummarizeArgs) -> Result<SummarizeOutput, CliError> {
    let config = classifier_config(&args.classifier)?;
    let Aggregation { series, report } = load_and_aggregate(&args.input)?;
    let summary_by = match &args.summary_by {
        Some(raw) => Dimension::parse_list(raw)?,
        None => series.dimensions().to_vec(),
    };

    let classified = match args.model {
        ModelArg::Static => classify_series(&StaticClassifier::new(config)?, &series)?,
        ModelArg::Dynamic => classify_series(&DynamicClassifier::new(config)?, &series)?,
    };
    let mut rows = summarize(&classified, &summary_by)?;
    if let Some(n) = args.top {
        rows = top(rows, n);
    }

    Ok(SummarizeOutput {
        model: classified.model,
        config,
        report,
        summary_by,
        rows,
    })
}

fn classifier_config(args: &ClassifierArgs) -> Result<ClassifierConfig, CliError> {
    resolve_classifier_config(args.config.as_deref(), &args.overrides())
}

pub fn aggregation_options(args: &InputArgs) -> Result<AggregationOptions, CliError> {
    let dimensions = Dimension::parse_list(&args.by)?;
    let filter = RecordFilter::new()
        .with_date_range(args.from, args.to)
        .allowing(Dimension::Source, args.sources.iter().cloned())
        .allowing(Dimension::Label, args.labels.iter().cloned())
        .allowing(Dimension::Region, args.regions.iter().cloned())
        .allowing(Dimension::SubRegion, args.sub_regions.iter().cloned())
        .with_sentiments(args.sentiments.iter().cloned());
    let missing = if args.fill_missing {
        MissingDimensionPolicy::FillPlaceholder
    } else {
        MissingDimensionPolicy::Drop
    };
    let options = AggregationOptions::new(dimensions)
        .with_missing(missing)
        .with_filter(filter);
    options.validate()?;
    Ok(options)
}

fn load_and_aggregate(args: &InputArgs) -> Result<Aggregation, CliError> {
    let options = aggregation_options(args)?;
    let records = load_records(&args.input)?;
    Ok(aggregate(&records, &options)?)
}

fn restrict_to_top(
    series: AggregatedSeries,
    n: Option<usize>,
    rank_placeholders: bool,
) -> Result<AggregatedSeries, CliError> {
    match n {
        Some(n) => {
            let groups = if rank_placeholders {
                top_groups_by_volume(&series, n)
            } else {
                top_reported_groups_by_volume(&series, n)
            };
            tracing::info!(
                requested = n,
                kept = groups.len(),
                "restricting to top groups by volume"
            );
            Ok(retain_groups(&series, &groups)?)
        }
        None => Ok(series),
    }
}
