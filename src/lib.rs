//! Budgeted node coverage on weighted graphs.
//!
//! Selects N nodes of a weighted undirected graph so that as many nodes as
//! possible lie within a distance budget D of the selection, using a
//! genetic algorithm:
//!
//! - **Graph & coverage oracle** ([`graph`]): vertex/edge storage and the
//!   distance-bounded reachability queries used as the objective.
//! - **Genetic Algorithm** ([`ga`]): tournament selection, splice
//!   crossover, replacement mutation, and elitist replacement driving the
//!   search.
//!
//! # Example
//!
//! ```
//! use u_coverage::ga::{CoverageGa, GaConfig};
//! use u_coverage::graph::parse_graph;
//!
//! let graph = parse_graph("4 3\n0 0\n1 0\n2 0\n3 0\n0 1 1\n1 2 1\n2 3 1\n").unwrap();
//! let config = GaConfig::default()
//!     .with_subset_size(2)
//!     .with_distance_budget(1.0)
//!     .with_population_size(10)
//!     .with_generations(10)
//!     .with_seed(7);
//!
//! let result = CoverageGa::new(&graph, config).unwrap().run().unwrap();
//! assert_eq!(result.best.len(), 2);
//! assert!(result.best_fitness <= graph.num_nodes());
//! ```
//!
//! # Reproducibility
//!
//! Every stochastic step draws from one RNG created from
//! [`GaConfig::seed`](ga::GaConfig::seed); seeded runs repeat exactly.

pub mod error;
pub mod ga;
pub mod graph;
pub mod random;

pub use error::{ConfigError, GaError, GraphError, ParseError};
