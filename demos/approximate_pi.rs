//! Evolves an arithmetic expression of constants that approximates pi.
//!
//! `PI_GENERATIONS` bounds the run (default 10000).
//! Run with `RUST_LOG=info cargo run --example approximate_pi`.

use rand::Rng;
use std::f64::consts::PI;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use u_cgp::cgp::{functions, CgpConfig, CgpProblem, CgpRunner, Individual};

struct ApproximatePi {
    train: Vec<Vec<f64>>,
    target: Vec<f64>,
}

impl CgpProblem for ApproximatePi {
    fn random_constant<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random()
    }

    // Total absolute error over the training rows.
    fn evaluate(&self, ind: &mut Individual) -> f64 {
        let mut error = 0.0;
        for (row, target) in self.train.iter().zip(&self.target) {
            match ind.run(row) {
                Ok(out) => error += (target - out[0]).abs(),
                Err(_) => return f64::INFINITY,
            }
        }
        error
    }
}

fn main() {
    env_logger::init();

    let max_generations = std::env::var("PI_GENERATIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000);

    let rows = 50;
    let problem = ApproximatePi {
        train: vec![vec![0.0]; rows],
        target: vec![PI; rows],
    };

    let config = CgpConfig::default()
        .with_population_size(100)
        .with_num_genes(50)
        .with_mutation_rate(0.05)
        .with_functions(functions::standard())
        .with_num_threads(8);

    let mut runner = match CgpRunner::new(config, problem) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Never raised here; shows where an interrupt handler would plug in.
    let cancel = Arc::new(AtomicBool::new(false));
    let result = runner.solve_with_cancel(max_generations, 0.001, true, Some(cancel));

    println!(
        "solution after {} generations ({} evaluations): fitness={:.6}, {}",
        result.generations,
        result.evaluations,
        result.best_fitness,
        runner.parent()
    );
    println!("elapsed time: {:?}", result.elapsed);
}
