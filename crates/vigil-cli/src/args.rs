// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::ConfigOverrides;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Flag news-volume anomalies against static and trailing-window baselines.
#[derive(Debug, Parser)]
#[command(name = "vigil", version, propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv); RUST_LOG applies when absent
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count records per group and month
    Aggregate(AggregateArgs),
    /// Classify every group-month as Normal, Alert-high or Alarm-high
    Classify(ClassifyArgs),
    /// Rank groups by their Alarm-high and Alert-high months
    Summarize(SummarizeArgs),
}

impl Command {
    pub fn output_path(&self) -> Option<&Path> {
        let input = match self {
            Self::Aggregate(args) => &args.input,
            Self::Classify(args) => &args.input,
            Self::Summarize(args) => &args.input,
        };
        input.output.as_deref()
    }
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Record file: .json, .jsonl/.ndjson or .csv
    #[arg(long)]
    pub input: PathBuf,

    /// Comma-separated grouping dimensions (region, sub_region, label, source)
    #[arg(long, default_value = "region")]
    pub by: String,

    /// Group records missing a dimension under a placeholder instead of dropping them
    #[arg(long)]
    pub fill_missing: bool,

    /// Earliest record date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest record date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long = "source", value_name = "SOURCE")]
    pub sources: Vec<String>,

    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    #[arg(long = "sub-region", value_name = "SUB_REGION")]
    pub sub_regions: Vec<String>,

    /// Keep only records with this sentiment label (repeatable), e.g. Negative
    #[arg(long = "sentiment", value_name = "SENTIMENT")]
    pub sentiments: Vec<String>,

    /// Write JSON here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ClassifierArgs {
    /// JSON classifier config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub window_periods: Option<usize>,

    #[arg(long)]
    pub min_window_samples: Option<usize>,

    #[arg(long)]
    pub alert_z: Option<f64>,

    #[arg(long)]
    pub alarm_z: Option<f64>,
}

impl ClassifierArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            window_periods: self.window_periods,
            min_window_samples: self.min_window_samples,
            alert_z: self.alert_z,
            alarm_z: self.alarm_z,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ModelSelection {
    Static,
    Dynamic,
    #[default]
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    Static,
    #[default]
    Dynamic,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = ModelSelection::Both)]
    pub model: ModelSelection,

    /// Keep only the N highest-volume groups
    #[arg(long)]
    pub top: Option<usize>,

    /// Let placeholder groups such as "Unknown County" compete for --top
    #[arg(long)]
    pub rank_placeholders: bool,

    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Dimensions to summarize by; defaults to --by
    #[arg(long)]
    pub summary_by: Option<String>,

    #[arg(long, value_enum, default_value_t = ModelArg::Dynamic)]
    pub model: ModelArg,

    /// Keep only the first N rows of the ranked table
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub classifier: ClassifierArgs,
}
