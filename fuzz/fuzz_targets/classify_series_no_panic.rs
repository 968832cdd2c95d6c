// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use libfuzzer_sys::fuzz_target;
use vigil_baseline::{DynamicClassifier, StaticClassifier, classify_series};
use vigil_core::{
    AggregatedPoint, AggregatedSeries, ClassifierConfig, Dimension, GroupKey, Period, Status,
};

const MAX_POINTS: usize = 512;

fn count_from(cursor: &mut common::ByteCursor<'_>) -> u64 {
    match cursor.next_u8() % 8 {
        0 => cursor.next_u64(),
        1 => 0,
        _ => u64::from(cursor.next_u16()),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);

    let config = ClassifierConfig {
        window_periods: common::bounded(cursor.next_u8(), 0, 48),
        min_window_samples: common::bounded(cursor.next_u8(), 0, 12),
        alert_z: f64::from(cursor.next_u8()) / 32.0,
        alarm_z: f64::from(cursor.next_u8()) / 16.0,
    };

    let groups = common::bounded(cursor.next_u8(), 1, 4);
    let mut points = Vec::new();
    let mut periods = vec![Period::new(2000, 1).expect("valid start period"); groups];
    while !cursor.is_exhausted() && points.len() < MAX_POINTS {
        let group = usize::from(cursor.next_u8()) % groups;
        let gap = i64::from(cursor.next_u8() % 6) + 1;
        let Ok(period) = periods[group].offset(gap) else {
            break;
        };
        periods[group] = period;
        let key: GroupKey = [format!("group-{group}")].into_iter().collect();
        points.push(AggregatedPoint::new(key, period, count_from(&mut cursor)));
    }

    let Ok(series) = AggregatedSeries::from_points(vec![Dimension::Region], points) else {
        return;
    };

    if let Ok(classifier) = StaticClassifier::new(config) {
        if let Ok(out) = classify_series(&classifier, &series) {
            assert_eq!(out.points.len(), series.len());
        }
    }

    if let Ok(classifier) = DynamicClassifier::new(config) {
        if let Ok(out) = classify_series(&classifier, &series) {
            assert_eq!(out.points.len(), series.len());
            for point in &out.points {
                assert!(point.z_score.is_finite());
                if point.baseline_mean.is_none() {
                    assert_eq!(point.status, Status::Normal);
                }
            }
        }
    }
});
