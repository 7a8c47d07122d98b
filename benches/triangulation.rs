//! Benchmarks for the per-generation pipeline
//!
//! Measures Bowyer–Watson construction, adjacency extraction and a full
//! simulation step at the population sizes the automaton actually runs at.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use voronoi_automaton::*;

const SIZES: [usize; 4] = [50, 200, 500, 1000];

fn random_sites(n: usize, bounds: &Bounds) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
    generate_sites(n, bounds, &mut rng)
}

fn bench_triangulation(c: &mut Criterion) {
    let bounds = Bounds::new(800.0, 600.0);
    let mut group = c.benchmark_group("bowyer_watson");

    for &n in &SIZES {
        let sites = random_sites(n, &bounds);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("random_sites", n), &sites, |b, sites| {
            b.iter(|| black_box(build_triangulation_within(sites, &bounds)));
        });
    }

    group.finish();
}

fn bench_adjacency(c: &mut Criterion) {
    let bounds = Bounds::new(800.0, 600.0);
    let mut group = c.benchmark_group("extract_adjacency");

    for &n in &SIZES {
        let sites = random_sites(n, &bounds);
        let triangulation = build_triangulation_within(&sites, &bounds);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::new("random_sites", n),
            &triangulation,
            |b, tri| {
                b.iter(|| black_box(extract_adjacency(&tri.triangles, tri.site_count)));
            },
        );
    }

    group.finish();
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for &n in &[50usize, 200] {
        let config = SimulationConfigBuilder::new()
            .seed(42)
            .canvas(800.0, 600.0)
            .and_then(|b| b.initial_sites(n))
            .and_then(|b| b.build())
            .unwrap();

        group.bench_with_input(BenchmarkId::new("initial_sites", n), &config, |b, &config| {
            b.iter_with_setup(
                || Simulation::new(config).unwrap(),
                |mut sim| {
                    black_box(sim.step());
                },
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_triangulation,
    bench_adjacency,
    bench_simulation_step
);
criterion_main!(benches);
