// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use std::cmp::Reverse;
use vigil_baseline::{
    DynamicClassifier, StaticClassifier, classify_series, classify_static_and_dynamic,
};
use vigil_core::{
    AggregatedPoint, AggregatedSeries, ClassifierConfig, Dimension, GroupKey, Period, Status,
};
use vigil_summary::{GroupSummary, divergences, summarize, summarize_groups};

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

const REGIONS: [&str; 3] = ["Jonglei", "Unity", "Lakes"];
const LABELS: [&str; 2] = ["Flooding", "Conflict"];

fn series_from(counts: &[Vec<u64>]) -> AggregatedSeries {
    let start = Period::new(2021, 1).expect("valid period");
    let mut points = Vec::new();
    for (idx, group_counts) in counts.iter().enumerate() {
        let key: GroupKey = [REGIONS[idx % REGIONS.len()], LABELS[idx / REGIONS.len()]]
            .into_iter()
            .collect();
        for (month, &count) in group_counts.iter().enumerate() {
            points.push(AggregatedPoint::new(
                key.clone(),
                start.offset(month as i64).expect("offset"),
                count,
            ));
        }
    }
    AggregatedSeries::from_points(vec![Dimension::Region, Dimension::Label], points)
        .expect("valid series")
}

#[test]
fn jonglei_end_to_end_ranks_the_spiking_county_first() {
    let input = series_from(&[
        vec![5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 30],
        vec![7, 8, 7, 8, 7, 8, 7, 8, 7, 8, 7, 8],
    ]);
    let classifier = StaticClassifier::new(ClassifierConfig::default()).expect("config");
    let classified = classify_series(&classifier, &input).expect("classify");
    let table = summarize(&classified, &[Dimension::Region]).expect("summarize");

    assert_eq!(table[0].name, "Jonglei");
    assert_eq!(table[0].counts.alarm_high, 1);
    assert_eq!(table[0].latest.status, Status::AlarmHigh);
    assert_eq!(table[1].name, "Unity");
    assert_eq!(table[1].counts.alarm_high, 0);
    assert_eq!(table[1].counts.alert_high, 6);
}

#[test]
fn static_and_dynamic_diverge_on_the_jonglei_spike() {
    let input = series_from(&[vec![5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 30]]);
    let (static_out, dynamic_out) =
        classify_static_and_dynamic(ClassifierConfig::default(), &input).expect("classify");
    let report = divergences(&static_out, &dynamic_out).expect("compare");
    assert_eq!(report.compared, 12);
    assert_eq!(report.divergences.len(), 1);
    assert_eq!(report.divergences[0].static_status, Status::AlarmHigh);
    assert_eq!(report.divergences[0].dynamic_status, Status::Normal);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/ranking.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn summaries_conserve_points_and_stay_ranked(
        counts in prop::collection::vec(prop::collection::vec(0u64..60, 1..30), 1..=6),
    ) {
        let input = series_from(&counts);
        let classifier = DynamicClassifier::new(ClassifierConfig::default()).expect("config");
        let classified = classify_series(&classifier, &input).expect("classify");

        for by in [vec![Dimension::Region], vec![Dimension::Label], Vec::new()] {
            let table = summarize(&classified, &by).expect("summarize");
            let total: usize = table.iter().map(|row| row.counts.total()).sum();
            prop_assert_eq!(total, classified.points.len());
            for pair in table.windows(2) {
                let key = |row: &GroupSummary| {
                    (
                        Reverse(row.counts.alarm_high),
                        Reverse(row.counts.alert_high),
                        row.name.clone(),
                    )
                };
                prop_assert!(key(&pair[0]) <= key(&pair[1]));
            }
        }

        let per_group = summarize_groups(&classified).expect("summarize");
        prop_assert_eq!(per_group.len(), input.group_count());
    }
}
