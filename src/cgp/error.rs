//! Error types.

/// Invalid run parameters, reported by [`CgpConfig::validate`](super::CgpConfig::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2")]
    PopulationTooSmall,
    #[error("mutation_rate must be in [0, 1], got {0}")]
    MutationRateOutOfRange(f64),
    #[error("num_inputs must be at least 1")]
    NoInputs,
    #[error("num_outputs must be at least 1")]
    NoOutputs,
    #[error("at least one function must be provided")]
    EmptyFunctionSet,
    #[error("function `{name}` has arity {arity}, exceeding max_arity {max_arity}")]
    FunctionArityTooLarge {
        name: String,
        arity: usize,
        max_arity: usize,
    },
    #[error("num_threads must be at least 1")]
    NoThreads,
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Errors raised while building or executing an individual.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CgpError {
    #[error("expected {expected} inputs, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("expected {expected} genes, got {actual}")]
    GeneCount { expected: usize, actual: usize },
    #[error("expected {expected} outputs, got {actual}")]
    OutputCount { expected: usize, actual: usize },
    #[error("gene {gene} has {actual} connections, expected {expected}")]
    ConnectionCount {
        gene: usize,
        expected: usize,
        actual: usize,
    },
    #[error("gene {gene} selects unknown function {function}")]
    UnknownFunction { gene: usize, function: usize },
    #[error("gene at position {position} connects forward to {connection}")]
    ForwardConnection { position: usize, connection: usize },
    #[error("output {output} selects position {position}, limit is {limit}")]
    OutputOutOfRange {
        output: usize,
        position: usize,
        limit: usize,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
