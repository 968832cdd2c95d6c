// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Period aggregation of raw records into sparse grouped count series.

pub mod aggregator;
pub mod cache;
pub mod filter;
pub mod ranking;

pub use aggregator::{
    Aggregation, AggregationOptions, AggregationReport, MissingDimensionPolicy, aggregate,
};
pub use cache::{AggregationCache, CacheStats, DEFAULT_CACHE_CAPACITY, fingerprint};
pub use filter::RecordFilter;
pub use ranking::{
    GroupVolume, group_volumes, is_placeholder_group, retain_groups, top_groups_by_volume,
    top_reported_groups_by_volume,
};
