// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Status summaries and model comparisons over classified series.

pub mod divergence;
pub mod summary;

pub use divergence::{Divergence, DivergenceReport, divergences};
pub use summary::{
    GroupSummary, LatestStatus, StatusCounts, ranked_order, summarize, summarize_groups, top,
};
