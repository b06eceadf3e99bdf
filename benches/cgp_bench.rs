//! Criterion benchmarks for the CGP engine.
//!
//! Measures phenotype execution and whole generations on a synthetic
//! symbolic regression target, independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_cgp::cgp::{functions, operators, CgpConfig, CgpProblem, CgpRunner, Individual};
use u_cgp::random::create_rng;

// ===========================================================================
// Quadratic target: f(x) = x^2 + x + 1 sampled on [-1, 1]
// ===========================================================================

struct Quadratic {
    samples: Vec<f64>,
}

impl Quadratic {
    fn new(n: usize) -> Self {
        let samples = (0..n)
            .map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64)
            .collect();
        Self { samples }
    }
}

impl CgpProblem for Quadratic {
    fn random_constant<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(-1.0..1.0)
    }

    fn evaluate(&self, ind: &mut Individual) -> f64 {
        let mut error = 0.0;
        for &x in &self.samples {
            match ind.run(&[x]) {
                Ok(out) => error += (x * x + x + 1.0 - out[0]).abs(),
                Err(_) => return f64::INFINITY,
            }
        }
        error
    }
}

fn config(genes: usize) -> CgpConfig {
    CgpConfig::default()
        .with_num_genes(genes)
        .with_mutation_rate(0.05)
        .with_functions(functions::standard())
        .with_seed(42)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("individual_run");

    for &genes in &[50usize, 200, 1000] {
        let problem = Quadratic::new(2);
        let cfg = std::sync::Arc::new(config(genes));
        let ind = Individual::random(cfg, &problem, &mut create_rng(42)).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(genes), &ind, |b, ind| {
            let mut ind = ind.clone();
            b.iter(|| black_box(ind.run(black_box(&[0.5]))))
        });
    }
    group.finish();
}

fn bench_mutate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate");

    for &genes in &[50usize, 200, 1000] {
        let problem = Quadratic::new(2);
        let cfg = std::sync::Arc::new(config(genes));
        let mut rng = create_rng(7);
        let parent = Individual::random(cfg, &problem, &mut rng).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(genes), &parent, |b, parent| {
            b.iter(|| black_box(operators::mutate(parent, &problem, &mut rng)))
        });
    }
    group.finish();
}

fn bench_generations(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_quadratic");
    group.sample_size(10);

    for (pop, genes, gens) in [(5usize, 50usize, 200usize), (20, 100, 100), (100, 100, 20)] {
        for parallel in [false, true] {
            let id = format!("p{pop}_g{genes}_n{gens}_{}", if parallel { "par" } else { "seq" });
            group.bench_function(id, |b| {
                b.iter(|| {
                    let cfg = config(genes)
                        .with_population_size(pop)
                        .with_parallel(parallel);
                    let mut runner =
                        CgpRunner::new(cfg, Quadratic::new(21)).expect("valid config");
                    black_box(runner.solve(gens, 0.0, false))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_run, bench_mutate, bench_generations);
criterion_main!(benches);
