//! Distance-bounded coverage oracle.
//!
//! Answers "which nodes does a start node reach within a distance budget"
//! and aggregates that over a set of start nodes. Two reachability
//! semantics are available, selected with [`Reachability`].
//!
//! # Budgeted depth-first traversal
//!
//! The default semantics walk the graph depth-first from the start node,
//! treating the budget as a counter consumed along each traversed edge. A
//! neighbor is entered only if it has not been visited earlier in the same
//! traversal and its edge weight does not exceed the remaining budget.
//! Neighbors are examined in adjacency insertion order.
//!
//! Because the visited set is shared across the whole traversal, a node
//! first reached along an expensive path is never re-entered via a cheaper
//! one. The result is therefore a subset of the true bounded-distance
//! neighborhood, and it depends on edge insertion order.
//!
//! # Shortest-path reachability
//!
//! [`Reachability::ShortestPath`] reports every node whose shortest-path
//! distance from the start is within the budget (Dijkstra).

use super::types::Graph;
use crate::error::GraphError;
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Coverage semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reachability {
    /// Budget-consuming depth-first traversal in adjacency order.
    #[default]
    BudgetedDfs,

    /// All nodes at shortest-path distance `<= budget`.
    ShortestPath,
}

/// One pending node of the explicit DFS stack.
struct Frame {
    node: usize,
    remaining: f64,
    cursor: usize,
}

/// Min-heap entry for Dijkstra.
#[derive(PartialEq)]
struct Pending {
    dist: f64,
    node: usize,
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Graph {
    /// Nodes covered by `start` within `budget` using budgeted DFS.
    ///
    /// `start` itself is never part of the result.
    ///
    /// # Errors
    /// [`GraphError::UnknownNode`] if `start` is not a vertex,
    /// [`GraphError::InvalidBudget`] if `budget` is negative or NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_coverage::graph::Graph;
    ///
    /// let path = Graph::from_triples(
    ///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
    ///     &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)],
    /// ).unwrap();
    ///
    /// let covered = path.coverage(2, 1.0).unwrap();
    /// assert_eq!(covered.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn coverage(&self, start: usize, budget: f64) -> Result<BTreeSet<usize>, GraphError> {
        self.coverage_with(start, budget, Reachability::BudgetedDfs)
    }

    /// Nodes covered by `start` within `budget` under the given semantics.
    pub fn coverage_with(
        &self,
        start: usize,
        budget: f64,
        mode: Reachability,
    ) -> Result<BTreeSet<usize>, GraphError> {
        Ok(self.reach(start, budget, mode)?.into_iter().collect())
    }

    /// Union of [`coverage`](Self::coverage) over every node in `nodes`.
    ///
    /// Repeated nodes are harmless. An empty input yields an empty set.
    pub fn coverage_of_set(
        &self,
        nodes: &[usize],
        budget: f64,
    ) -> Result<BTreeSet<usize>, GraphError> {
        self.coverage_of_set_with(nodes, budget, Reachability::BudgetedDfs)
    }

    /// Union of per-node coverage under the given semantics.
    pub fn coverage_of_set_with(
        &self,
        nodes: &[usize],
        budget: f64,
        mode: Reachability,
    ) -> Result<BTreeSet<usize>, GraphError> {
        let mut covered = BTreeSet::new();
        for &node in nodes {
            covered.extend(self.reach(node, budget, mode)?);
        }
        Ok(covered)
    }

    /// Number of nodes covered by `nodes`.
    ///
    /// Equivalent to `coverage_of_set_with(..).len()` without building the
    /// ordered set.
    pub fn coverage_count(
        &self,
        nodes: &[usize],
        budget: f64,
        mode: Reachability,
    ) -> Result<usize, GraphError> {
        let mut covered = HashSet::new();
        for &node in nodes {
            covered.extend(self.reach(node, budget, mode)?);
        }
        Ok(covered.len())
    }

    /// Covered count divided by the number of vertices.
    ///
    /// Returns 0.0 for an empty graph.
    pub fn coverage_fraction(
        &self,
        nodes: &[usize],
        budget: f64,
        mode: Reachability,
    ) -> Result<f64, GraphError> {
        if self.num_nodes() == 0 {
            return Ok(0.0);
        }
        let count = self.coverage_count(nodes, budget, mode)?;
        Ok(count as f64 / self.num_nodes() as f64)
    }

    /// Reached nodes in discovery order, excluding `start`.
    fn reach(&self, start: usize, budget: f64, mode: Reachability) -> Result<Vec<usize>, GraphError> {
        if !self.contains(start) {
            return Err(self.unknown(start));
        }
        if budget.is_nan() || budget < 0.0 {
            return Err(GraphError::InvalidBudget(budget));
        }
        Ok(match mode {
            Reachability::BudgetedDfs => self.budgeted_dfs(start, budget),
            Reachability::ShortestPath => self.bounded_dijkstra(start, budget),
        })
    }

    /// Iterative form of the recursive budget-consuming DFS.
    ///
    /// Each frame keeps a cursor into its adjacency list so that neighbors are
    /// examined in exactly the order recursion would examine them, and the
    /// visited check happens at examination time.
    ///
    /// Bookkeeping grows with the reached region, not with the graph.
    fn budgeted_dfs(&self, start: usize, budget: f64) -> Vec<usize> {
        let mut visited = HashSet::from([start]);

        let mut reached = Vec::new();
        let mut stack = vec![Frame {
            node: start,
            remaining: budget,
            cursor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let adjacent = self.adjacent(frame.node);
            let Some(&(next, weight)) = adjacent.get(frame.cursor) else {
                stack.pop();
                continue;
            };
            frame.cursor += 1;

            if weight > frame.remaining || !visited.insert(next) {
                continue;
            }
            let remaining = frame.remaining - weight;
            reached.push(next);
            stack.push(Frame {
                node: next,
                remaining,
                cursor: 0,
            });
        }

        reached
    }

    /// Dijkstra truncated at `budget`.
    fn bounded_dijkstra(&self, start: usize, budget: f64) -> Vec<usize> {
        let mut dist = HashMap::from([(start, 0.0)]);
        let mut settled = HashSet::new();
        let mut heap = BinaryHeap::new();
        let mut reached = Vec::new();

        heap.push(Pending {
            dist: 0.0,
            node: start,
        });

        while let Some(Pending { dist: d, node }) = heap.pop() {
            if !settled.insert(node) {
                continue;
            }
            if node != start {
                reached.push(node);
            }

            for &(next, weight) in self.adjacent(node) {
                let candidate = d + weight;
                let best = dist.get(&next).copied().unwrap_or(f64::INFINITY);
                if candidate <= budget && candidate < best {
                    dist.insert(next, candidate);
                    heap.push(Pending {
                        dist: candidate,
                        node: next,
                    });
                }
            }
        }

        reached
    }
}
