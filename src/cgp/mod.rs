//! Cartesian Genetic Programming framework.
//!
//! A program is a fixed-length row of nodes over the virtual array
//! `[inputs ++ genes]`. Each gene selects a primitive [`Function`], holds
//! a constant and connects backwards to earlier positions, so the graph
//! is acyclic by construction and runs in a single forward pass.
//!
//! Users define their problem by implementing [`CgpProblem`], which
//! specifies how to score an individual and how to draw constants.
//!
//! # Key Types
//!
//! - [`CgpConfig`]: Genotype shape, function set and run parameters
//! - [`Individual`]: Genotype with reachability, execution and rendering
//! - [`CgpRunner`]: Executes the (1 + λ) evolutionary loop
//! - [`CgpResult`]: Outcome of a [`CgpRunner::solve`] call
//!
//! # Submodules
//!
//! - [`functions`]: Common numeric primitives and ready-made bundles
//! - [`operators`]: Point mutation
//!
//! # References
//!
//! - Miller & Thomson (2000), "Cartesian Genetic Programming"
//! - Miller (2011), *Cartesian Genetic Programming*, Springer
//! - Turner & Miller (2015), "Neutral genetic drift: an investigation
//!   using Cartesian Genetic Programming"

mod config;
mod error;
pub mod functions;
mod individual;
pub mod operators;
mod runner;
mod types;

pub use config::CgpConfig;
pub use error::{CgpError, ConfigError};
pub use individual::Individual;
pub use runner::{CgpResult, CgpRunner};
pub use types::{CgpProblem, Function, Gene};
