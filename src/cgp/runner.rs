//! CGP evolutionary loop execution.
//!
//! [`CgpRunner`] drives a (1 + λ) evolution strategy:
//! mutate parent → evaluate offspring → elitist replacement → repeat.

use super::config::CgpConfig;
use super::error::ConfigError;
use super::individual::Individual;
use super::operators::mutate;
use super::types::CgpProblem;
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a [`CgpRunner::solve`] call.
#[derive(Debug, Clone)]
pub struct CgpResult {
    /// The parent when the run stopped.
    pub best: Individual,

    /// Fitness of the parent (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Number of generations executed by this call.
    pub generations: usize,

    /// Wall-clock time spent in this call.
    pub elapsed: Duration,

    /// Total offspring evaluations since the runner was created.
    pub evaluations: usize,

    /// Whether the parent reached the fitness threshold.
    pub converged: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Parent fitness at the end of each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the CGP evolutionary loop.
///
/// The population has a fixed size. Slot 0 holds the parent; the other
/// slots hold the offspring of the most recent generation.
///
/// # Usage
///
/// ```ignore
/// let config = CgpConfig::default().with_functions(functions::arithmetic()).with_seed(42);
/// let mut runner = CgpRunner::new(config, MyProblem)?;
/// let result = runner.solve(1000, 0.0, true);
/// println!("{}", runner.parent());
/// ```
pub struct CgpRunner<P: CgpProblem> {
    config: Arc<CgpConfig>,
    problem: P,
    rng: StdRng,
    population: Vec<Individual>,
    num_evaluations: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<P: CgpProblem> CgpRunner<P> {
    /// Validates the configuration and creates a random seed parent.
    ///
    /// The seed parent is not evaluated; its fitness is `+inf`. With
    /// `num_threads` set, a dedicated rayon pool of that size is built.
    pub fn new(config: CgpConfig, problem: P) -> Result<Self, ConfigError> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) if config.parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))?,
            ),
            _ => None,
        };

        let config = Arc::new(config);
        let mut rng = rng_from_seed(config.seed);

        let mut population = Vec::with_capacity(config.population_size);
        population.push(Individual::random_unchecked(
            Arc::clone(&config),
            &problem,
            &mut rng,
        ));

        Ok(Self {
            config,
            problem,
            rng,
            population,
            num_evaluations: 0,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &CgpConfig {
        &self.config
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The current population. Slot 0 is the parent.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The best individual found so far.
    pub fn parent(&self) -> &Individual {
        &self.population[0]
    }

    /// Total number of fitness evaluations so far.
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }

    /// Runs one generation.
    ///
    /// Offspring are created sequentially from the shared generator, so
    /// the offspring set for a given seed does not depend on how the
    /// evaluation is scheduled. The best offspring (first one on ties)
    /// replaces the parent when its fitness is lower or equal.
    pub fn run_generation(&mut self) {
        self.population.truncate(1);

        let offspring: Vec<Individual> = (1..self.config.population_size)
            .map(|_| mutate(&self.population[0], &self.problem, &mut self.rng))
            .collect();
        self.population.extend(offspring);

        self.evaluate_population();
        self.num_evaluations += self.population.len() - 1;

        if let Some(best) = find_best(&self.population[1..]) {
            if self.population[1 + best].fitness() <= self.population[0].fitness() {
                self.population[0] = self.population[1 + best].clone();
            }
        }
    }

    /// Scores every offspring, inside the dedicated pool when there is one.
    fn evaluate_population(&mut self) {
        let problem = &self.problem;
        let offspring = &mut self.population[1..];
        let parallel = self.config.parallel;

        #[cfg(feature = "parallel")]
        {
            if let Some(pool) = &self.pool {
                pool.install(|| evaluate_offspring(problem, offspring, parallel));
                return;
            }
        }

        evaluate_offspring(problem, offspring, parallel);
    }

    /// Evolves until `max_generations` is reached or the parent's fitness
    /// drops to `fitness_threshold` or below.
    ///
    /// With `report_progress`, every improvement of the parent is logged
    /// at `info` level together with its expression.
    pub fn solve(
        &mut self,
        max_generations: usize,
        fitness_threshold: f64,
        report_progress: bool,
    ) -> CgpResult {
        self.solve_with_cancel(max_generations, fitness_threshold, report_progress, None)
    }

    /// Like [`solve`](Self::solve) with an optional cancellation token.
    ///
    /// The flag is checked between generations. A generation already in
    /// progress always completes.
    pub fn solve_with_cancel(
        &mut self,
        max_generations: usize,
        fitness_threshold: f64,
        report_progress: bool,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CgpResult {
        let start = Instant::now();
        let mut best_fitness = self.parent().fitness();
        let mut fitness_history = Vec::with_capacity(max_generations);
        let mut converged = best_fitness <= fitness_threshold;
        let mut cancelled = false;
        let mut generations = 0usize;

        log::debug!(
            "cgp run started: population {}, genes {}, max generations {max_generations}, threshold {fitness_threshold}",
            self.config.population_size,
            self.config.num_genes,
        );

        while !converged && generations < max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            self.run_generation();
            let fitness = self.parent().fitness();
            fitness_history.push(fitness);

            if fitness < best_fitness {
                best_fitness = fitness;
                if report_progress {
                    log::info!(
                        "gen: {generations}, fitness: {fitness:.6}, {}",
                        self.parent()
                    );
                }
                self.problem.on_improvement(generations, self.parent());
            }
            log::trace!("generation {generations} parent fitness {fitness}");

            self.problem.on_generation(generations, fitness);
            generations += 1;
            converged = fitness <= fitness_threshold;
        }

        let elapsed = start.elapsed();
        log::debug!(
            "cgp run stopped after {generations} generations in {elapsed:?}: fitness {}, converged {converged}, cancelled {cancelled}",
            self.parent().fitness()
        );

        CgpResult {
            best: self.parent().clone(),
            best_fitness: self.parent().fitness(),
            generations,
            elapsed,
            evaluations: self.num_evaluations,
            converged,
            cancelled,
            fitness_history,
        }
    }
}

/// Evaluate every offspring. Each task owns exactly one slot.
fn evaluate_offspring<P: CgpProblem>(problem: &P, offspring: &mut [Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            offspring.par_iter_mut().for_each(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in offspring.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Index of the lowest fitness, first occurrence on ties. NaN never wins.
fn find_best(population: &[Individual]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, ind) in population.iter().enumerate() {
        let f = ind.fitness();
        if f.is_nan() {
            continue;
        }
        match best {
            Some(b) if population[b].fitness() <= f => {}
            _ => best = Some(i),
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
