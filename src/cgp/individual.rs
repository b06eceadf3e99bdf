//! Genotype, active-gene resolution, phenotype execution and rendering.
//!
//! An [`Individual`] is a row of [`Gene`]s plus output selectors over the
//! virtual array `[inputs ++ genes]`. Only genes reachable from an output
//! are *active*; the rest are carried along unexpressed and skipped by
//! both [`run`](Individual::run) and the expression renderer.

use super::config::CgpConfig;
use super::error::CgpError;
use super::types::{CgpProblem, Gene};
use rand::Rng;
use std::fmt::{self, Write};
use std::sync::{Arc, OnceLock};

/// A candidate program.
///
/// Individuals are value objects: the genotype is fixed at construction
/// and mutation always produces a new individual. The one exception is
/// self-repair during [`run`](Individual::run).
#[derive(Clone)]
pub struct Individual {
    config: Arc<CgpConfig>,
    genes: Vec<Gene>,
    outputs: Vec<usize>,
    fitness: f64,
    active: OnceLock<Vec<bool>>,
}

impl Individual {
    /// Creates a random individual.
    ///
    /// Every connection of the gene at position `p` is drawn from
    /// `[0, p)` and every output from `[0, num_inputs + num_genes)`.
    pub fn random<P: CgpProblem, R: Rng>(
        config: Arc<CgpConfig>,
        problem: &P,
        rng: &mut R,
    ) -> Result<Self, CgpError> {
        config.validate()?;
        Ok(Self::random_unchecked(config, problem, rng))
    }

    /// Like [`random`](Self::random) for an already validated config.
    pub(crate) fn random_unchecked<P: CgpProblem, R: Rng>(
        config: Arc<CgpConfig>,
        problem: &P,
        rng: &mut R,
    ) -> Self {
        let n_in = config.num_inputs;
        let mut genes = Vec::with_capacity(config.num_genes);
        for k in 0..config.num_genes {
            let function = rng.random_range(0..config.functions.len());
            let constant = problem.random_constant(rng);
            let mut connections = Vec::with_capacity(config.max_arity);
            for _ in 0..config.max_arity {
                connections.push(rng.random_range(0..n_in + k));
            }
            genes.push(Gene {
                function,
                constant,
                connections,
            });
        }

        let outputs = (0..config.num_outputs)
            .map(|_| rng.random_range(0..config.num_positions()))
            .collect();

        Self::from_unchecked(config, genes, outputs)
    }

    /// Builds an individual from an explicit genotype.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, if the gene, output or connection
    /// counts do not match it, if a gene selects a function outside the
    /// set, if a connection does not point strictly backwards, or if an
    /// output selects a position outside `[0, num_inputs + num_genes)`.
    pub fn from_parts(
        config: Arc<CgpConfig>,
        genes: Vec<Gene>,
        outputs: Vec<usize>,
    ) -> Result<Self, CgpError> {
        config.validate()?;
        if genes.len() != config.num_genes {
            return Err(CgpError::GeneCount {
                expected: config.num_genes,
                actual: genes.len(),
            });
        }
        if outputs.len() != config.num_outputs {
            return Err(CgpError::OutputCount {
                expected: config.num_outputs,
                actual: outputs.len(),
            });
        }
        for (k, gene) in genes.iter().enumerate() {
            if gene.function >= config.functions.len() {
                return Err(CgpError::UnknownFunction {
                    gene: k,
                    function: gene.function,
                });
            }
            if gene.connections.len() != config.max_arity {
                return Err(CgpError::ConnectionCount {
                    gene: k,
                    expected: config.max_arity,
                    actual: gene.connections.len(),
                });
            }
            let position = config.num_inputs + k;
            if let Some(&connection) = gene.connections.iter().find(|&&c| c >= position) {
                return Err(CgpError::ForwardConnection {
                    position,
                    connection,
                });
            }
        }
        let limit = config.num_positions();
        let out_of_range = outputs.iter().enumerate().find(|&(_, &p)| p >= limit);
        if let Some((output, &position)) = out_of_range {
            return Err(CgpError::OutputOutOfRange {
                output,
                position,
                limit,
            });
        }
        Ok(Self::from_unchecked(config, genes, outputs))
    }

    pub(crate) fn from_unchecked(
        config: Arc<CgpConfig>,
        genes: Vec<Gene>,
        outputs: Vec<usize>,
    ) -> Self {
        Self {
            config,
            genes,
            outputs,
            fitness: f64::INFINITY,
            active: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Arc<CgpConfig> {
        &self.config
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Logical positions feeding each output, in output order.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Fitness assigned by the last evaluation. `+inf` if never evaluated.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Reachability over all logical positions.
    ///
    /// Inputs are always active. Computed on first use and memoized.
    pub fn active_genes(&self) -> &[bool] {
        self.active
            .get_or_init(|| resolve_active(&self.config, &self.genes, &self.outputs))
    }

    pub fn is_active(&self, position: usize) -> bool {
        self.active_genes().get(position).copied().unwrap_or(false)
    }

    /// Number of active genes, inputs excluded.
    pub fn active_count(&self) -> usize {
        self.active_genes()[self.config.num_inputs..]
            .iter()
            .filter(|&&a| a)
            .count()
    }

    /// Executes the program on one input vector.
    ///
    /// Active genes are evaluated in increasing position order. A gene
    /// whose function returns NaN is permanently switched to function 0
    /// and re-evaluated with that function, so a faulty node repairs
    /// itself the first time it is exercised.
    ///
    /// # Errors
    ///
    /// [`CgpError::ArityMismatch`] if `input.len() != num_inputs`.
    pub fn run(&mut self, input: &[f64]) -> Result<Vec<f64>, CgpError> {
        let config = &self.config;
        let n_in = config.num_inputs;
        if input.len() != n_in {
            return Err(CgpError::ArityMismatch {
                expected: n_in,
                actual: input.len(),
            });
        }

        let mask = self
            .active
            .get_or_init(|| resolve_active(&self.config, &self.genes, &self.outputs));

        let mut values = vec![0.0; config.num_positions()];
        values[..n_in].copy_from_slice(input);
        let mut args = Vec::with_capacity(1 + config.max_arity);
        let mut repaired = false;

        for (k, gene) in self.genes.iter_mut().enumerate() {
            let position = n_in + k;
            if !mask[position] {
                continue;
            }

            let function = &config.functions[gene.function];
            fill_args(&mut args, gene, function.arity(), &values);
            let mut value = function.eval(&args);

            if value.is_nan() && gene.function != 0 {
                log::trace!(
                    "gene at position {position} returned NaN from `{}`, falling back to `{}`",
                    function.name(),
                    config.functions[0].name()
                );
                gene.function = 0;
                let fallback = &config.functions[0];
                fill_args(&mut args, gene, fallback.arity(), &values);
                value = fallback.eval(&args);
                repaired = true;
            }

            values[position] = value;
        }

        let result = self.outputs.iter().map(|&o| values[o]).collect();

        // Reachability depends on arities, which a repair may have changed.
        if repaired {
            self.active = OnceLock::new();
        }

        Ok(result)
    }

    /// Renders one equation per output, e.g. `f0(x0,x1)=(x0+x1)`.
    ///
    /// Intended for humans only.
    pub fn expression(&self) -> String {
        self.to_string()
    }

    /// Lists inputs, active genes and output selectors, one per line.
    pub fn listing(&self) -> String {
        let n_in = self.config.num_inputs;
        let mut out = String::new();
        for i in 0..n_in {
            let _ = writeln!(out, "{i}: x{i}");
        }
        for (k, gene) in self.genes.iter().enumerate() {
            let position = n_in + k;
            if !self.is_active(position) {
                continue;
            }
            let _ = writeln!(
                out,
                "{position}: {} {:?} {:.6}",
                self.config.functions[gene.function].name(),
                gene.connections,
                gene.constant
            );
        }
        for (o, position) in self.outputs.iter().enumerate() {
            let _ = writeln!(out, "output{o}: {position}");
        }
        out
    }

    /// Writes the expression rooted at `root`.
    ///
    /// Walks the graph with an explicit stack of pending frames, so deep
    /// chains render without growing the call stack.
    fn write_node<W: Write>(&self, w: &mut W, root: usize) -> fmt::Result {
        let n_in = self.config.num_inputs;
        let mut pending = vec![Frame::Node(root)];

        while let Some(frame) = pending.pop() {
            let position = match frame {
                Frame::Char(c) => {
                    w.write_char(c)?;
                    continue;
                }
                Frame::Node(p) if p < n_in => {
                    write!(w, "x{p}")?;
                    continue;
                }
                Frame::Node(p) => p,
            };

            let gene = &self.genes[position - n_in];
            let function = &self.config.functions[gene.function];
            let args = &gene.connections[..function.arity()];

            let separator = match function.name() {
                "const" => {
                    write!(w, "{:.6}", gene.constant)?;
                    continue;
                }
                "add" => '+',
                "sub" => '-',
                "mul" => '*',
                "div" => '/',
                name => {
                    w.write_str(name)?;
                    ','
                }
            };
            w.write_char('(')?;

            // Pushed in reverse so the first argument is written first
            pending.push(Frame::Char(')'));
            for (i, &c) in args.iter().enumerate().rev() {
                pending.push(Frame::Node(c));
                if i > 0 {
                    pending.push(Frame::Char(separator));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (o, &position) in self.outputs.iter().enumerate() {
            if o > 0 {
                f.write_char('\n')?;
            }
            write!(f, "f{o}(x0")?;
            for i in 1..self.config.num_inputs {
                write!(f, ",x{i}")?;
            }
            f.write_str(")=")?;
            self.write_node(f, position)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("genes", &self.genes)
            .field("outputs", &self.outputs)
            .field("fitness", &self.fitness)
            .finish_non_exhaustive()
    }
}

/// Pending work of the expression renderer.
enum Frame {
    Node(usize),
    Char(char),
}

/// Marks every position reachable from the outputs.
///
/// Uses an explicit worklist, so genotype depth is not bounded by the
/// call stack. Connections beyond a function's arity are inert.
fn resolve_active(config: &CgpConfig, genes: &[Gene], outputs: &[usize]) -> Vec<bool> {
    let n_in = config.num_inputs;
    let mut active = vec![false; config.num_positions()];
    active[..n_in].fill(true);

    let mut pending: Vec<usize> = outputs.to_vec();
    while let Some(position) = pending.pop() {
        if active[position] {
            continue;
        }
        active[position] = true;
        let gene = &genes[position - n_in];
        let arity = config.functions[gene.function].arity();
        pending.extend(
            gene.connections[..arity]
                .iter()
                .copied()
                .filter(|&c| !active[c]),
        );
    }
    active
}

fn fill_args(args: &mut Vec<f64>, gene: &Gene, arity: usize, values: &[f64]) {
    args.clear();
    args.push(gene.constant);
    args.extend(gene.connections[..arity].iter().map(|&c| values[c]));
}
