//! Cartesian Genetic Programming (CGP).
//!
//! Evolves small numeric programs, encoded as fixed-length feed-forward
//! graphs of primitive functions, toward a target behavior:
//!
//! - **Genotype**: a row of genes, each selecting a function, holding a
//!   constant and pointing backwards to earlier nodes. Acyclic by
//!   construction.
//! - **Phenotype**: only the genes reachable from the outputs are
//!   executed, in a single forward pass.
//! - **Evolution**: a (1 + λ) strategy. Offspring are mutated copies of
//!   the parent, evaluated in parallel, and the best one replaces the
//!   parent when it is at least as fit.
//!
//! Users plug in their problem by implementing [`cgp::CgpProblem`]
//! (fitness evaluation and constant generation) and choose a function set
//! in [`cgp::CgpConfig`].
//!
//! # Example
//!
//! ```
//! use rand::Rng;
//! use u_cgp::cgp::{functions, CgpConfig, CgpProblem, CgpRunner, Individual};
//!
//! struct Pi;
//!
//! impl CgpProblem for Pi {
//!     fn random_constant<R: Rng>(&self, rng: &mut R) -> f64 {
//!         rng.random_range(0.0..4.0)
//!     }
//!
//!     fn evaluate(&self, individual: &mut Individual) -> f64 {
//!         match individual.run(&[0.0]) {
//!             Ok(out) => (out[0] - std::f64::consts::PI).abs(),
//!             Err(_) => f64::INFINITY,
//!         }
//!     }
//! }
//!
//! let config = CgpConfig::default()
//!     .with_num_genes(10)
//!     .with_functions(functions::arithmetic())
//!     .with_seed(42);
//! let mut runner = CgpRunner::new(config, Pi).unwrap();
//! let result = runner.solve(200, 0.0, false);
//! assert!(result.best_fitness.is_finite());
//! ```

pub mod cgp;
pub mod random;
