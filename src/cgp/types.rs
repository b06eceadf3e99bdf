//! Core definitions shared by the CGP engine.
//!
//! [`Function`] is one primitive of the function set, [`Gene`] one node
//! of the genotype graph, and [`CgpProblem`] the contract between the
//! generic engine and a domain-specific fitness measure.

use super::individual::Individual;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

type EvalFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// A named primitive usable inside an evolved program.
///
/// The evaluation rule receives `1 + arity` values: the gene's constant
/// first, followed by the values of its first `arity` connections.
///
/// ```
/// use u_cgp::cgp::Function;
///
/// let add = Function::new("add", 2, |x| x[1] + x[2]);
/// assert_eq!(add.eval(&[0.0, 2.0, 3.0]), 5.0);
/// ```
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    eval: Arc<EvalFn>,
}

impl Function {
    /// Registers a primitive with the given name, arity and rule.
    pub fn new<F>(name: impl Into<String>, arity: usize, eval: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            eval: Arc::new(eval),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Applies the rule to `[constant, in_1, .., in_arity]`.
    pub fn eval(&self, inputs: &[f64]) -> f64 {
        (self.eval)(inputs)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// One node of the genotype.
///
/// A gene at index `k` lives at logical position `num_inputs + k`. Every
/// connection must point to a strictly lower position, which keeps the
/// graph acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    /// Index into the configured function set.
    pub function: usize,
    /// Constant handed to the function as its first argument.
    pub constant: f64,
    /// Logical positions feeding this node, always `max_arity` long.
    pub connections: Vec<usize>,
}

/// Defines a CGP optimization problem.
///
/// The engine handles genotype construction, mutation and selection;
/// the implementor decides what a good program is.
///
/// # Thread Safety
///
/// Offspring are evaluated in parallel, so problems must be
/// `Send + Sync`. Each call to [`evaluate`](CgpProblem::evaluate) gets
/// exclusive access to its own individual.
pub trait CgpProblem: Send + Sync {
    /// Draws a constant for a freshly created or mutated gene.
    ///
    /// Determines the numeric domain of evolved constants.
    fn random_constant<R: Rng>(&self, rng: &mut R) -> f64;

    /// Evaluates an individual and returns its fitness.
    ///
    /// Lower is better; `0.0` conventionally marks a perfect program.
    /// The individual may be run any number of times. Running it can
    /// repair genes in place (see [`Individual::run`]).
    fn evaluate(&self, individual: &mut Individual) -> f64;

    /// Called at the end of each generation with the parent's fitness.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}

    /// Called whenever the parent's fitness strictly improves.
    fn on_improvement(&self, _generation: usize, _parent: &Individual) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_accessors() {
        let f = Function::new("pass1", 2, |x| x[1]);
        assert_eq!(f.name(), "pass1");
        assert_eq!(f.arity(), 2);
        assert_eq!(f.eval(&[9.0, 4.0, 5.0]), 4.0);
    }

    #[test]
    fn test_function_debug_omits_rule() {
        let f = Function::new("neg", 1, |x| -x[1]);
        let s = format!("{f:?}");
        assert!(s.contains("neg"));
        assert!(s.contains("arity: 1"));
    }

    #[test]
    fn test_function_clone_shares_rule() {
        let f = Function::new("sq", 1, |x| x[1] * x[1]);
        let g = f.clone();
        assert_eq!(g.eval(&[0.0, 3.0]), 9.0);
    }
}
