// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_canvas::{CanvasConfig, CanvasEngine, PointerEvent};
use canopy_layout::{MindMap, NodeRecord};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};

/// A flat grid of positioned nodes under one root.
fn grid(side: usize) -> MindMap {
    let mut records = vec![
        NodeRecord::new("root").with_children((0..side * side).map(|i| format!("n{i}"))),
    ];
    records[0].stored = Some(Point::new(-400.0, 0.0));
    for i in 0..side * side {
        let mut record = NodeRecord::new(format!("n{i}"));
        record.stored = Some(Point::new((i % side) as f64 * 200.0, (i / side) as f64 * 60.0));
        records.push(record);
    }
    MindMap::from_records("root", records).unwrap()
}

fn engine(side: usize) -> CanvasEngine {
    let mut engine = CanvasEngine::new(CanvasConfig::default(), Size::new(1920.0, 1080.0));
    engine.set_document(grid(side), Vec::new());
    engine
}

fn bench_visible_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas/visible_nodes");
    for side in [10_usize, 50, 100] {
        let engine = engine(side);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &engine, |b, engine| {
            b.iter(|| black_box(engine.visible_nodes().len()));
        });
    }
    group.finish();
}

fn bench_box_select_move(c: &mut Criterion) {
    // Each move recomputes the box preview against every laid-out node.
    let mut group = c.benchmark_group("canvas/box_select_move");
    for side in [10_usize, 50, 100] {
        let mut engine = engine(side);
        engine.pointer_down(PointerEvent::mouse(-50.0, -20.0));
        let mut t = 0.0;
        group.bench_function(BenchmarkId::from_parameter(side * side), |b| {
            b.iter(|| {
                t = (t + 7.0) % 1800.0;
                black_box(engine.pointer_move(PointerEvent::mouse(t, t * 0.5)));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_visible_nodes, bench_box_select_move);
criterion_main!(benches);
