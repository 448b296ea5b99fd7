// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_layout::{LayoutConfig, LayoutEngine, MindMap, NodeRecord, PositionMap, compute_layout};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;

/// A map with `len` nodes and fan-out 4. Every third node has a stored position.
fn build_map(len: usize) -> MindMap {
    let records = (0..len)
        .map(|i| {
            let mut record = NodeRecord::new(format!("n{i}"))
                .with_children((1..=4).map(|k| 4 * i + k).filter(|&c| c < len).map(|c| format!("n{c}")));
            if i % 3 == 0 {
                record.stored = Some(Point::new((i % 17) as f64 * 40.0, (i / 17) as f64 * 60.0));
            }
            record
        })
        .collect();
    MindMap::from_records("n0", records).unwrap()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/compute");
    let config = LayoutConfig::default();
    let overrides = PositionMap::new();
    for len in [100_usize, 1_000, 10_000] {
        let map = build_map(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &map, |b, map| {
            b.iter(|| black_box(compute_layout(map, &overrides, &config)));
        });
    }
    group.finish();
}

fn bench_cached(c: &mut Criterion) {
    // Unchanged inputs should cost a key comparison, not a layout pass.
    let mut group = c.benchmark_group("layout/cached");
    let overrides = PositionMap::new();
    for len in [1_000_usize, 10_000] {
        let map = build_map(len);
        let mut engine = LayoutEngine::default();
        engine.compute(&map, &overrides);
        group.bench_with_input(BenchmarkId::from_parameter(len), &map, |b, map| {
            b.iter(|| black_box(engine.compute(map, &overrides).len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute, bench_cached);
criterion_main!(benches);
