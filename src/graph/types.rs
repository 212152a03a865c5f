//! Graph data model: vertices, weighted undirected edges, adjacency.

use crate::error::GraphError;

/// 2D coordinates of a vertex.
///
/// Carried for display purposes only; coverage never looks at them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An undirected weighted edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    /// Distance along the edge. Finite and non-negative.
    pub weight: f64,
}

impl Edge {
    pub fn new(a: usize, b: usize, weight: f64) -> Self {
        Self { a, b, weight }
    }
}

impl From<(usize, usize, f64)> for Edge {
    fn from((a, b, weight): (usize, usize, f64)) -> Self {
        Self { a, b, weight }
    }
}

/// An immutable weighted undirected graph.
///
/// Vertices are identified by their position in the vertex list. Each edge
/// is stored in both endpoints' adjacency lists, in insertion order; that
/// order is the order in which coverage traversal examines neighbors.
///
/// # Examples
///
/// ```
/// use u_coverage::graph::Graph;
///
/// // Path 0 - 1 - 2 with unit weights
/// let graph = Graph::from_triples(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
///     &[(0, 1, 1.0), (1, 2, 1.0)],
/// ).unwrap();
///
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
/// assert_eq!(graph.edge_weight(1, 2).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Point>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Graph {
    /// Builds a graph from vertex coordinates and an edge list.
    ///
    /// # Errors
    /// - [`GraphError::UnknownNode`] if an edge endpoint is not a vertex index
    /// - [`GraphError::InvalidWeight`] if a weight is negative, NaN or infinite
    /// - [`GraphError::DuplicateEdge`] if the same unordered pair appears twice
    pub fn new(vertices: Vec<Point>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let num_nodes = vertices.len();
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_nodes];

        for edge in &edges {
            for node in [edge.a, edge.b] {
                if node >= num_nodes {
                    return Err(GraphError::UnknownNode { node, num_nodes });
                }
            }
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    a: edge.a,
                    b: edge.b,
                    weight: edge.weight,
                });
            }
            if adjacency[edge.a].iter().any(|&(v, _)| v == edge.b) {
                return Err(GraphError::DuplicateEdge {
                    a: edge.a,
                    b: edge.b,
                });
            }

            adjacency[edge.a].push((edge.b, edge.weight));
            if edge.a != edge.b {
                adjacency[edge.b].push((edge.a, edge.weight));
            }
        }

        Ok(Self {
            vertices,
            edges,
            adjacency,
        })
    }

    /// Builds a graph from `(x, y)` pairs and `(a, b, weight)` triples.
    pub fn from_triples(
        vertices: &[(f64, f64)],
        edges: &[(usize, usize, f64)],
    ) -> Result<Self, GraphError> {
        Self::new(
            vertices.iter().copied().map(Point::from).collect(),
            edges.iter().copied().map(Edge::from).collect(),
        )
    }

    /// Number of vertices.
    pub fn num_nodes(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns `true` if `node` is a vertex index of this graph.
    pub fn contains(&self, node: usize) -> bool {
        node < self.vertices.len()
    }

    /// Coordinates of `node`.
    pub fn coordinates(&self, node: usize) -> Result<Point, GraphError> {
        self.vertices
            .get(node)
            .copied()
            .ok_or_else(|| self.unknown(node))
    }

    /// Neighbors of `node` in adjacency order.
    ///
    /// Empty if the node has no edges or is not a vertex.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacent(node).iter().map(|&(v, _)| v)
    }

    /// `(neighbor, weight)` pairs of `node` in adjacency order.
    pub fn adjacent(&self, node: usize) -> &[(usize, f64)] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges incident to `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacent(node).len()
    }

    /// Weight of the edge between `a` and `b`.
    ///
    /// # Errors
    /// [`GraphError::UnknownNode`] if either endpoint is not a vertex,
    /// [`GraphError::MissingEdge`] if they are not adjacent.
    pub fn edge_weight(&self, a: usize, b: usize) -> Result<f64, GraphError> {
        for node in [a, b] {
            if !self.contains(node) {
                return Err(self.unknown(node));
            }
        }
        self.adjacency[a]
            .iter()
            .find(|&&(v, _)| v == b)
            .map(|&(_, w)| w)
            .ok_or(GraphError::MissingEdge { a, b })
    }

    pub(crate) fn unknown(&self, node: usize) -> GraphError {
        GraphError::UnknownNode {
            node,
            num_nodes: self.num_nodes(),
        }
    }
}
