// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Deterministic synthetic inputs shared by the vigil benchmarks.

use vigil_core::{
    AggregatedPoint, AggregatedSeries, Dimension, GroupKey, Period, Record, VigilError,
};

const REGIONS: [&str; 10] = [
    "Central Equatoria",
    "Eastern Equatoria",
    "Jonglei",
    "Lakes",
    "Northern Bahr el Ghazal",
    "Unity",
    "Upper Nile",
    "Warrap",
    "Western Bahr el Ghazal",
    "Western Equatoria",
];

const LABELS: [&str; 4] = ["Flooding", "Conflict", "Food Crisis", "Displacement"];

pub fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// `groups` series of `months` consecutive periods with noisy counts and
/// occasional spikes.
pub fn synthetic_series(groups: usize, months: usize) -> Result<AggregatedSeries, VigilError> {
    let start = Period::new(2000, 1)?;
    let mut state = 0xfeed_f00d_dead_beef_u64;
    let mut points = Vec::with_capacity(groups * months);
    for group in 0..groups {
        let key: GroupKey = [format!("county-{group:05}")].into_iter().collect();
        let mut period = start;
        for _ in 0..months {
            let noise = lcg_next(&mut state) % 20;
            let spike = if lcg_next(&mut state) % 50 == 0 { 200 } else { 0 };
            points.push(AggregatedPoint::new(key.clone(), period, 20 + noise + spike));
            period = period.succ()?;
        }
    }
    AggregatedSeries::from_points(vec![Dimension::SubRegion], points)
}

/// `n` records spread over ten regions, four labels and `months` months,
/// with a small share of unparseable timestamps and missing regions.
pub fn synthetic_records(n: usize, months: u64) -> Vec<Record> {
    let mut state = 0x0dd_ba11_u64;
    (0..n)
        .map(|_| {
            let month = lcg_next(&mut state) % months.max(1);
            let year = 2000 + month / 12;
            let day = lcg_next(&mut state) % 28 + 1;
            let timestamp = if lcg_next(&mut state) % 200 == 0 {
                "unknown".to_string()
            } else {
                format!("{year}-{:02}-{day:02}T12:00:00Z", month % 12 + 1)
            };
            let mut record = Record::new(timestamp)
                .with_label(LABELS[(lcg_next(&mut state) % 4) as usize]);
            if lcg_next(&mut state) % 100 != 0 {
                record = record.with_region(REGIONS[(lcg_next(&mut state) % 10) as usize]);
            }
            record
        })
        .collect()
}
