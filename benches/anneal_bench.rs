//! Criterion benchmarks for K-SAT cost evaluation and annealing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ksat_anneal::ksat::KsatInstance;
use ksat_anneal::sa::{AnnealConfig, AnnealRunner};

// ===========================================================================
// Cost evaluation: full scan, product form, incremental vs naive delta
// ===========================================================================

fn bench_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("ksat_cost");

    for &(n, m) in &[(100usize, 400usize), (1000, 4000)] {
        let inst = KsatInstance::new(n, m, 3, Some(42)).expect("valid instance");
        group.bench_with_input(BenchmarkId::new("max_scan", m), &inst, |b, inst| {
            b.iter(|| black_box(inst.cost()))
        });
        group.bench_with_input(BenchmarkId::new("product", m), &inst, |b, inst| {
            b.iter(|| black_box(inst.cost_by_product()))
        });
    }
    group.finish();
}

fn bench_delta_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("ksat_delta_cost");

    for &(n, m) in &[(100usize, 400usize), (1000, 4000)] {
        let inst = KsatInstance::new(n, m, 3, Some(7)).expect("valid instance");
        group.bench_with_input(BenchmarkId::new("incremental", n), &inst, |b, inst| {
            b.iter(|| {
                for v in 0..inst.num_vars() {
                    black_box(inst.delta_cost(v));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("naive", n), &inst, |b, inst| {
            b.iter(|| {
                for v in 0..inst.num_vars().min(50) {
                    black_box(inst.naive_delta_cost(v));
                }
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Full anneal
// ===========================================================================

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("ksat_anneal");
    group.sample_size(10);

    for &n in &[50usize, 200] {
        let inst = KsatInstance::new(n, 3 * n, 3, Some(42)).expect("valid instance");
        let config = AnnealConfig::default()
            .with_mcmc_steps(200)
            .with_anneal_steps(50)
            .with_early_stopping(false)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(inst, config),
            |b, (inst, config)| {
                b.iter(|| {
                    let mut state = inst.clone();
                    let result = AnnealRunner::run(black_box(&mut state), black_box(config));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_cost, bench_delta_cost, bench_anneal);
criterion_main!(benches);
