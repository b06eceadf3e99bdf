//! Evolves a program that reverses its three inputs.
//!
//! Run with `RUST_LOG=info cargo run --example reverse_inputs`.

use rand::Rng;
use u_cgp::cgp::{CgpConfig, CgpProblem, CgpRunner, Function, Individual};

struct ReverseInputs;

impl CgpProblem for ReverseInputs {
    fn random_constant<R: Rng>(&self, _rng: &mut R) -> f64 {
        0.0
    }

    // One point per wrong output, 0 is perfect.
    fn evaluate(&self, ind: &mut Individual) -> f64 {
        let outputs = match ind.run(&[1.0, 2.0, 3.0]) {
            Ok(outputs) => outputs,
            Err(_) => return f64::INFINITY,
        };
        [3.0, 2.0, 1.0]
            .iter()
            .zip(&outputs)
            .filter(|(want, got)| want != got)
            .count() as f64
    }
}

fn main() {
    env_logger::init();

    // Two no-op primitives that pass one of their inputs through.
    let config = CgpConfig::default()
        .with_population_size(5)
        .with_num_genes(10)
        .with_mutation_rate(0.01)
        .with_num_inputs(3)
        .with_num_outputs(3)
        .with_max_arity(2)
        .with_functions(vec![
            Function::new("pass1", 2, |x| x[1]),
            Function::new("pass2", 2, |x| x[2]),
        ]);

    let mut runner = match CgpRunner::new(config, ReverseInputs) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let result = runner.solve(1000, 0.0, true);
    println!(
        "fitness {} after {} generations ({} evaluations) in {:?}",
        result.best_fitness, result.generations, result.evaluations, result.elapsed
    );
    println!("{}", runner.parent());
    print!("{}", runner.parent().listing());
}
