//! CGP configuration.
//!
//! [`CgpConfig`] holds the genotype shape, the function set and the
//! parameters of the evolutionary loop. After validation it is shared
//! read-only by the runner and every individual.

use super::error::ConfigError;
use super::types::Function;

/// Configuration for a CGP run.
///
/// # Defaults
///
/// ```
/// use u_cgp::cgp::CgpConfig;
///
/// let config = CgpConfig::default();
/// assert_eq!(config.population_size, 5);
/// assert_eq!(config.num_genes, 100);
/// assert!(config.functions.is_empty());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_cgp::cgp::{functions, CgpConfig};
///
/// let config = CgpConfig::default()
///     .with_population_size(300)
///     .with_num_genes(100)
///     .with_mutation_rate(0.1)
///     .with_num_inputs(21)
///     .with_functions(functions::standard())
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CgpConfig {
    /// Parent plus offspring per generation. At least 2.
    pub population_size: usize,

    /// Number of function genes in every genotype.
    pub num_genes: usize,

    /// Fraction of the genotype's fields touched by one mutation (0.0–1.0).
    ///
    /// At least one point mutation is always applied.
    pub mutation_rate: f64,

    /// Length of the input vector. At least 1.
    pub num_inputs: usize,

    /// Length of the output vector. At least 1.
    pub num_outputs: usize,

    /// Number of connections carried by every gene.
    ///
    /// Must be at least the arity of every registered function.
    pub max_arity: usize,

    /// The primitives available to evolution.
    ///
    /// Index 0 doubles as the fallback when a primitive returns NaN.
    pub functions: Vec<Function>,

    /// Whether to evaluate offspring in parallel using rayon.
    pub parallel: bool,

    /// Worker threads for parallel evaluation.
    ///
    /// `None` uses rayon's global pool. Ignored when `parallel` is off.
    pub num_threads: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for CgpConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            num_genes: 100,
            mutation_rate: 0.05,
            num_inputs: 1,
            num_outputs: 1,
            max_arity: 2,
            functions: Vec::new(),
            parallel: true,
            num_threads: None,
            seed: None,
        }
    }
}

impl CgpConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of genes.
    pub fn with_num_genes(mut self, n: usize) -> Self {
        self.num_genes = n;
        self
    }

    /// Sets the mutation rate. Out-of-range values are rejected by
    /// [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_num_inputs(mut self, n: usize) -> Self {
        self.num_inputs = n;
        self
    }

    pub fn with_num_outputs(mut self, n: usize) -> Self {
        self.num_outputs = n;
        self
    }

    pub fn with_max_arity(mut self, arity: usize) -> Self {
        self.max_arity = arity;
        self
    }

    /// Replaces the function set.
    pub fn with_functions(mut self, functions: Vec<Function>) -> Self {
        self.functions = functions;
        self
    }

    /// Appends one function to the function set.
    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluates offspring on a dedicated pool of `n` threads.
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of logical positions: inputs followed by genes.
    pub fn num_positions(&self) -> usize {
        self.num_inputs + self.num_genes
    }

    /// Size of the flat mutation index space: every gene's function,
    /// constant and connections, plus every output selector.
    pub fn mutable_fields(&self) -> usize {
        self.num_genes * (2 + self.max_arity) + self.num_outputs
    }

    /// Number of point mutations applied to produce one offspring.
    pub fn mutations_per_offspring(&self) -> usize {
        let n = (self.mutation_rate * self.mutable_fields() as f64).round() as usize;
        n.max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }
        if self.num_inputs == 0 {
            return Err(ConfigError::NoInputs);
        }
        if self.num_outputs == 0 {
            return Err(ConfigError::NoOutputs);
        }
        if self.functions.is_empty() {
            return Err(ConfigError::EmptyFunctionSet);
        }
        if self.num_threads == Some(0) {
            return Err(ConfigError::NoThreads);
        }
        if let Some(f) = self.functions.iter().find(|f| f.arity() > self.max_arity) {
            return Err(ConfigError::FunctionArityTooLarge {
                name: f.name().to_string(),
                arity: f.arity(),
                max_arity: self.max_arity,
            });
        }
        Ok(())
    }
}
