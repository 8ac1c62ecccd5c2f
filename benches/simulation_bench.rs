//! Benchmarks for the simulation tick loop.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use finger_god::grid::hex::Point2D;
use finger_god::grid::map::TileMap;
use finger_god::scenario::Scenario;

fn bench_skirmish(c: &mut Criterion) {
    let scenario = Scenario::random_skirmish(42, 32, 20, 8);

    c.bench_function("skirmish_120_ticks", |b| {
        b.iter(|| {
            let (mut sim, _) = scenario.build().expect("skirmish builds");
            let events = sim.run(black_box(120), black_box(0.25)).expect("skirmish runs");
            black_box(events)
        });
    });
}

fn bench_pathfinding(c: &mut Criterion) {
    let scenario = Scenario::random_skirmish(7, 64, 40, 0);
    let map: TileMap = scenario.build_map();

    c.bench_function("find_path_across_64x40", |b| {
        b.iter(|| {
            let path = map.find_path(black_box(Point2D::new(0, 0)), black_box(Point2D::new(63, 39)));
            black_box(path)
        });
    });
}

criterion_group!(benches, bench_skirmish, bench_pathfinding);
criterion_main!(benches);
