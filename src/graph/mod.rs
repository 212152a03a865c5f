//! Weighted undirected graph and distance-bounded coverage oracle.
//!
//! # Key Types
//!
//! - [`Graph`]: Immutable vertex/edge storage with insertion-ordered adjacency
//! - [`Reachability`]: Coverage semantics (budgeted DFS or shortest path)
//!
//! # Coverage
//!
//! [`Graph::coverage`] returns the nodes a single start node covers within a
//! distance budget; [`Graph::coverage_of_set`] unions that over a selection.
//! See the [`coverage`] module docs for the exact traversal contract.
//!
//! # Text Format
//!
//! [`parse_graph`] and [`load_graph`] read the `.txt` instance format.

pub mod coverage;
mod parse;
mod types;

pub use coverage::Reachability;
pub use parse::{load_graph, parse_graph};
pub use types::{Edge, Graph, Point};
