// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_selection::Selection;
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

fn bench_replace(c: &mut Criterion) {
    // Box selections over large maps replace the whole selection at once.
    let mut group = c.benchmark_group("selection/replace");
    for len in [128_usize, 2_048, 8_192] {
        let keys: Vec<u32> = (0..(len as u32)).collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("scan", len), &keys, |b, keys| {
            b.iter_batched(
                Selection::<u32>::new,
                |mut sel| {
                    sel.replace_with(keys.iter().copied());
                    black_box(sel);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("hashed", len), &keys, |b, keys| {
            b.iter_batched(
                Selection::<u32>::new,
                |mut sel| {
                    sel.replace_with_hashed(keys.iter().copied());
                    black_box(sel);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/toggle");
    for len in [128_usize, 2_048] {
        let mut sel = Selection::new();
        sel.replace_with_hashed(0..(len as u32));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let key = (len / 2) as u32;
            b.iter(|| {
                sel.toggle(black_box(key));
                sel.toggle(black_box(key));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_replace, bench_toggle);
criterion_main!(benches);
