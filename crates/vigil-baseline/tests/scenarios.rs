// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use vigil_baseline::{DynamicClassifier, StaticClassifier, classify_static_and_dynamic};
use vigil_core::{
    AggregatedPoint, AggregatedSeries, Baseline, BaselineClassifier, ClassifierConfig, Dimension,
    GroupKey, Period, Status, Thresholds, classify_z, z_score,
};

const JONGLEI: [u64; 12] = [5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 30];

fn monthly(name: &str, start: Period, counts: &[u64]) -> Vec<AggregatedPoint> {
    let key: GroupKey = [name].into_iter().collect();
    counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            AggregatedPoint::new(key.clone(), start.offset(idx as i64).expect("offset"), count)
        })
        .collect()
}

fn jonglei() -> Vec<AggregatedPoint> {
    monthly("Jonglei", Period::new(2023, 1).expect("valid period"), &JONGLEI)
}

#[test]
fn jonglei_static_flags_only_the_spike() {
    let classifier = StaticClassifier::new(ClassifierConfig::default()).expect("config");
    let out = classifier.classify_group(&jonglei()).expect("classify");

    let spike = out.last().expect("twelve points");
    let mean = spike.baseline_mean.expect("defined");
    let std_dev = spike.baseline_std_dev.expect("defined");
    assert!((mean - 85.0 / 12.0).abs() < 1e-12, "mean={mean}");
    assert!((6.8..7.0).contains(&std_dev), "std_dev={std_dev}");
    assert!((3.3..3.4).contains(&spike.z_score), "z={}", spike.z_score);
    assert_eq!(spike.status, Status::AlarmHigh);

    for point in &out[..11] {
        assert_eq!(point.status, Status::Normal);
        assert!(point.z_score < 0.0);
    }
}

#[test]
fn jonglei_dynamic_suppresses_then_sees_flat_window() {
    let classifier = DynamicClassifier::new(ClassifierConfig::default()).expect("config");
    let out = classifier.classify_group(&jonglei()).expect("classify");

    for point in &out[..3] {
        assert_eq!(point.status, Status::Normal);
        assert!(point.baseline_mean.is_none());
    }
    for point in &out[3..] {
        assert_eq!(point.baseline_mean, Some(5.0));
        assert_eq!(point.baseline_std_dev, Some(0.0));
        assert_eq!(point.z_score, 0.0);
        assert_eq!(point.status, Status::Normal);
    }
    assert_eq!(out[11].baseline_samples, 11);
}

#[test]
fn jonglei_dynamic_flags_a_second_spike_after_variance_appears() {
    let mut counts = JONGLEI.to_vec();
    counts.push(6);
    counts.push(40);
    let points = monthly("Jonglei", Period::new(2023, 1).expect("valid period"), &counts);
    let classifier = DynamicClassifier::new(ClassifierConfig::default()).expect("config");
    let out = classifier.classify_group(&points).expect("classify");

    // Window for the last point is the 12 months before it, which now
    // includes the 30 spike.
    let last = out.last().expect("points");
    assert_eq!(last.baseline_samples, 12);
    assert!(last.baseline_std_dev.expect("defined") > 0.0);
    assert_eq!(last.status, Status::AlarmHigh);
}

#[test]
fn threshold_boundaries_are_inclusive() {
    let window = [8, 12, 8, 12];
    let start = Period::new(2024, 1).expect("valid period");
    let classifier = DynamicClassifier::new(ClassifierConfig::default()).expect("config");

    for (count, expected) in [(12, Status::AlertHigh), (14, Status::AlarmHigh), (11, Status::Normal)] {
        let mut counts = window.to_vec();
        counts.push(count);
        let points = monthly("Central Equatoria", start, &counts);
        let out = classifier.classify_group(&points).expect("classify");
        let last = out.last().expect("points");
        assert_eq!(last.baseline_mean, Some(10.0));
        assert_eq!(last.baseline_std_dev, Some(2.0));
        assert_eq!(last.status, expected, "count={count}");
    }

    let baseline = Some(Baseline {
        mean: 10.0,
        std_dev: 2.0,
        samples: 4,
    });
    let thresholds = Thresholds::default();
    assert_eq!(classify_z(z_score(12.0, baseline), &thresholds), Status::AlertHigh);
    assert_eq!(classify_z(z_score(14.0, baseline), &thresholds), Status::AlarmHigh);
    assert_eq!(classify_z(z_score(11.9999, baseline), &thresholds), Status::Normal);
}

#[test]
fn alternate_thresholds_move_the_boundary() {
    let config = ClassifierConfig {
        alert_z: 1.5,
        alarm_z: 3.0,
        ..ClassifierConfig::default()
    };
    let classifier = StaticClassifier::new(config).expect("config");
    let out = classifier.classify_group(&jonglei()).expect("classify");
    assert_eq!(out.last().map(|p| p.status), Some(Status::AlarmHigh));

    let strict = StaticClassifier::new(ClassifierConfig {
        alert_z: 3.5,
        alarm_z: 4.0,
        ..ClassifierConfig::default()
    })
    .expect("config");
    let out = strict.classify_group(&jonglei()).expect("classify");
    assert_eq!(out.last().map(|p| p.status), Some(Status::Normal));
}

#[test]
fn groups_are_classified_independently() {
    let start = Period::new(2023, 1).expect("valid period");
    let mut points = jonglei();
    points.extend(monthly("Unity", start, &[100, 300, 100, 300, 100]));
    let series =
        AggregatedSeries::from_points(vec![Dimension::Region], points).expect("valid series");

    let (static_out, _) =
        classify_static_and_dynamic(ClassifierConfig::default(), &series).expect("classify");
    let jonglei_key: GroupKey = ["Jonglei"].into_iter().collect();
    let alone = StaticClassifier::new(ClassifierConfig::default())
        .expect("config")
        .classify_group(&jonglei())
        .expect("classify");
    assert_eq!(static_out.group(&jonglei_key), alone.as_slice());
    assert_eq!(static_out.diagnostics.groups, 2);
}
