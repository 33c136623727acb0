//! Benchmarks for distance computation and full queries.
//!
//! Queries are brute force, so cost is linear in values × dimension. The
//! memoized runs measure the cache on repeat queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use easyknn::{weighted_distance, Coordinate, Dataset, NeighborsParams, Plan, Value, Weight};
use rand::prelude::*;

// === Generators ===

/// Random coordinates with roughly `missing` of them undefined.
fn random_coords(rng: &mut StdRng, dim: usize, missing: f64) -> Vec<Coordinate> {
    let mut coords: Vec<Coordinate> = (0..dim)
        .map(|_| {
            if rng.gen_bool(missing) {
                None
            } else {
                Some(rng.gen::<f64>() * 2.0 - 1.0)
            }
        })
        .collect();
    if coords.iter().all(Option::is_none) {
        coords[0] = Some(0.0);
    }
    coords
}

fn build_plan(rng: &mut StdRng, groups: usize, per_group: usize, dim: usize) -> Plan {
    let mut plan = Plan::new();
    for _ in 0..groups {
        let mut ds = Dataset::new();
        ds.add_values((0..per_group).map(|_| {
            Value::new(random_coords(rng, dim, 0.1)).expect("at least one coordinate")
        }))
        .expect("fresh values");
        plan.add_dataset(ds).expect("fresh dataset");
    }
    plan
}

// === Benchmarks ===

fn bench_weighted_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_distance");
    let mut rng = StdRng::seed_from_u64(42);

    for dim in [4, 16, 64, 256].iter() {
        group.throughput(Throughput::Elements(*dim as u64));

        let a = random_coords(&mut rng, *dim, 0.1);
        let b = random_coords(&mut rng, *dim, 0.1);
        let w = Weight::new((0..*dim).map(|i| Some(1.0 + i as f64 * 0.01)).collect())
            .expect("finite weights");

        group.bench_with_input(BenchmarkId::from_parameter(dim), dim, |bench, _| {
            bench.iter(|| weighted_distance(black_box(&a), black_box(&b), &w, true));
        });
    }

    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");
    let dim = 16;

    for n in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*n as u64));

        let mut rng = StdRng::seed_from_u64(7);
        let mut plan = build_plan(&mut rng, 10, n / 10, dim);
        let query = Value::new(random_coords(&mut rng, dim, 0.0)).expect("dense query");
        let uncached = NeighborsParams {
            memoize: false,
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::new("uncached", n), n, |bench, _| {
            bench.iter(|| plan.neighbors_with(black_box(&query), &uncached));
        });

        plan.neighbors(&query).expect("warm cache");
        group.bench_with_input(BenchmarkId::new("memoized", n), n, |bench, _| {
            bench.iter(|| plan.neighbors(black_box(&query)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weighted_distance, bench_neighbors);
criterion_main!(benches);
