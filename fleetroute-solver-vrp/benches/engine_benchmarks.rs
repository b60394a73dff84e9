//! Criterion benchmarks for the `vrp-core` engine.
//!
//! Measures solve time across instance sizes (10, 25, 50 locations) with a
//! fixed fleet of four vehicles and a generous travel limit, so every run
//! reaches a feasible plan.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package fleetroute-solver-vrp
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fleetroute_core::{Instance, ProblemConfig, SearchController, random_positions};
use fleetroute_solver_vrp::{VrpEngine, VrpEngineConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Instance sizes to benchmark, depot included.
const PROBLEM_SIZES: &[usize] = &[10, 25, 50];

/// Seed shared by every generated instance.
const BENCHMARK_SEED: u64 = 42;

/// Vehicles available in every instance.
const FLEET_SIZE: usize = 4;

/// Build a deterministic instance with `size` locations.
fn build_instance(size: usize) -> Option<Instance> {
    let mut rng = ChaCha8Rng::seed_from_u64(BENCHMARK_SEED);
    let positions = random_positions(size, 1000.0, &mut rng);
    ProblemConfig::new(size)
        .with_vehicles(FLEET_SIZE)
        .with_max_distance(10_000.0)
        .with_positions(positions)
        .with_seed(BENCHMARK_SEED)
        .build()
        .ok()
}

/// Benchmark baseline solve times for each instance size.
///
/// The engine runs with a reduced generation budget so a sample stays under a
/// second on small instances.
fn bench_solve_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_time");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let engine = VrpEngine::with_config(VrpEngineConfig {
        max_generations: 50,
        baseline_generations: 10,
    });

    for &size in PROBLEM_SIZES {
        let Some(instance) = build_instance(size) else {
            continue;
        };
        let controller = SearchController::new(&instance.model, engine);

        let Ok(throughput_size) = u64::try_from(size) else {
            continue;
        };
        group.throughput(Throughput::Elements(throughput_size));
        group.bench_with_input(BenchmarkId::new("locations", size), &size, |b, _| {
            b.iter(|| {
                #[expect(
                    clippy::let_underscore_must_use,
                    reason = "Benchmarking solve performance, result is intentionally discarded"
                )]
                let _ = controller.solve();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_times);
criterion_main!(benches);
