// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vigil_aggregate::{AggregationCache, AggregationOptions, aggregate, fingerprint};
use vigil_bench::synthetic_records;
use vigil_core::Dimension;

const RECORDS: usize = 200_000;
const MONTHS: u64 = 120;

fn benchmark_aggregation(c: &mut Criterion) {
    let records = synthetic_records(RECORDS, MONTHS);
    let by_region = AggregationOptions::new(vec![Dimension::Region]);
    let by_region_label = AggregationOptions::new(vec![Dimension::Region, Dimension::Label]);

    let mut group = c.benchmark_group("aggregate");
    group.bench_function("region_200k_records", |b| {
        b.iter(|| aggregate(black_box(&records), &by_region).expect("aggregation should succeed"))
    });
    group.bench_function("region_label_200k_records", |b| {
        b.iter(|| {
            aggregate(black_box(&records), &by_region_label).expect("aggregation should succeed")
        })
    });
    group.bench_function("fingerprint_200k_records", |b| {
        b.iter(|| fingerprint(black_box(&records)))
    });

    let cache = AggregationCache::default();
    cache
        .get_or_aggregate(&records, &by_region)
        .expect("warm-up aggregation should succeed");
    group.bench_function("cache_hit_200k_records", |b| {
        b.iter(|| {
            cache
                .get_or_aggregate(black_box(&records), &by_region)
                .expect("cached aggregation should succeed")
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_aggregation);
criterion_main!(benches);
