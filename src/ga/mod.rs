//! Genetic Algorithm for budgeted node coverage.
//!
//! Searches for N graph nodes whose combined coverage within a distance
//! budget is as large as possible. Fitness is the coverage cardinality
//! reported by the [`graph`](crate::graph) oracle; **higher is better**.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm and objective parameters, presets, validation
//! - [`CoverageGa`]: Generation stages as individual operations, plus the loop
//! - [`GaResult`]: Best selection found, with run statistics
//! - [`GenerationObserver`]: Per-generation progress callback
//!
//! # Submodules
//!
//! - [`operators`]: Splice crossover, replacement mutation, duplicate repair
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use operators::GeneRepair;
pub use runner::{CoverageGa, GaResult};
pub use types::{GenerationObserver, GenerationStats, Individual, Population};
