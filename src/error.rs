//! Error types.
//!
//! Every failure the crate can report is a configuration or data error:
//! nothing is retried internally, errors surface to the caller as-is.

use thiserror::Error;

/// Errors raised while building or querying a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("node {node} is not part of the graph ({num_nodes} vertices)")]
    UnknownNode { node: usize, num_nodes: usize },

    #[error("no edge between {a} and {b}")]
    MissingEdge { a: usize, b: usize },

    #[error("edge ({a}, {b}) has invalid weight {weight}: must be finite and non-negative")]
    InvalidWeight { a: usize, b: usize, weight: f64 },

    #[error("duplicate edge between {a} and {b}")]
    DuplicateEdge { a: usize, b: usize },

    #[error("distance budget must be non-negative, got {0}")]
    InvalidBudget(f64),
}

/// Invalid [`GaConfig`](crate::ga::GaConfig) parameters.
///
/// Returned by [`GaConfig::validate`](crate::ga::GaConfig::validate) before
/// the evolutionary loop starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("subset size must be in 1..={num_nodes}, got {subset_size}")]
    SubsetSize { subset_size: usize, num_nodes: usize },

    #[error("population_size must be even, got {0}")]
    OddPopulation(usize),

    #[error("population_size ({population_size}) must be at least the tournament size ({tournament_size})")]
    PopulationBelowTournament {
        population_size: usize,
        tournament_size: usize,
    },

    #[error("tournament_size must be at least 1")]
    ZeroTournament,

    #[error("mutation_rate must be in [0, 1], got {0}")]
    MutationRate(f64),

    #[error("distance_budget must be non-negative, got {0}")]
    NegativeBudget(f64),

    #[error("generations must be at least 1")]
    ZeroGenerations,

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// Errors raised while reading the graph text format.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header: expected `<num_vertices> <num_edges>`, got {0:?}")]
    Header(String),

    #[error("line {line}: {message}")]
    Line { line: usize, message: String },

    #[error("expected {expected} vertex lines, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("header declares {expected} edges, found {found}")]
    EdgeCount { expected: usize, found: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors returned by [`CoverageGa`](crate::ga::CoverageGa).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
