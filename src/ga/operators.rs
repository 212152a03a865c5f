//! Genetic operators for node-selection individuals.
//!
//! Individuals are fixed-length lists of node indices. These operators keep
//! the length fixed but, by themselves, do not keep the members distinct;
//! [`GeneRepair`] decides what happens to duplicates.
//!
//! # Crossover
//!
//! - [`splice_crossover`]: one-point list splice applied pairwise with a
//!   point shared by the whole generation
//!
//! # Mutation
//!
//! - [`replacement_mutation`]: drop `k` random members, append `k` fresh
//!   random nodes
//!
//! # Repair
//!
//! - [`resample_duplicates`]: replace repeated members with unused nodes

use super::types::{Individual, Population};
use rand::seq::index;
use rand::Rng;

/// Duplicate handling after crossover and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneRepair {
    /// Keep duplicates. The individual still has N entries but may select
    /// fewer than N distinct nodes; fitness counts coverage of the distinct
    /// ones.
    #[default]
    Tolerate,

    /// Replace every duplicate with a node not already selected, so each
    /// individual always holds N distinct nodes.
    Resample,
}

impl GeneRepair {
    /// Applies the policy to one individual.
    pub fn apply<R: Rng>(self, genes: &mut [usize], num_nodes: usize, rng: &mut R) {
        match self {
            GeneRepair::Tolerate => {}
            GeneRepair::Resample => resample_duplicates(genes, num_nodes, rng),
        }
    }
}

// ============================================================================
// Crossover
// ============================================================================

/// One-point splice crossover over consecutive parent pairs.
///
/// Parents `(2i, 2i+1)` produce
/// `child1 = p1[..point] ++ p2[point..]` and
/// `child2 = p2[..point] ++ p1[point..]`, in that order. The same `point`
/// is used for every pair. A point past the end of a parent is clamped to
/// its length.
///
/// # Complexity
/// O(P·N) time and space
///
/// # Panics
/// Panics if the number of parents is odd.
///
/// # Examples
///
/// ```
/// use u_coverage::ga::operators::splice_crossover;
///
/// let parents = vec![vec![1, 2, 3], vec![7, 8, 9]];
/// let children = splice_crossover(&parents, 1);
/// assert_eq!(children, vec![vec![1, 8, 9], vec![7, 2, 3]]);
/// ```
pub fn splice_crossover(parents: &[Individual], point: usize) -> Population {
    assert!(
        parents.len() % 2 == 0,
        "crossover requires an even number of parents"
    );

    let mut offspring = Vec::with_capacity(parents.len());
    for pair in parents.chunks_exact(2) {
        let (p1, p2) = (&pair[0], &pair[1]);
        offspring.push(splice(p1, p2, point));
        offspring.push(splice(p2, p1, point));
    }
    offspring
}

/// `head[..point] ++ tail[point..]`, with `point` clamped to each length.
fn splice(head: &[usize], tail: &[usize], point: usize) -> Individual {
    let mut child = Vec::with_capacity(tail.len().max(head.len()));
    child.extend_from_slice(&head[..point.min(head.len())]);
    child.extend_from_slice(&tail[point.min(tail.len())..]);
    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Replacement mutation.
///
/// Picks `k` uniformly in `1..=len`, removes `k` members at distinct random
/// positions (the rest keep their relative order), then appends `k` distinct
/// nodes sampled uniformly from `0..num_nodes`. Appended nodes are not
/// checked against the members that remain, so duplicates can appear.
///
/// Length is preserved. Empty individuals are left untouched.
///
/// # Panics
/// Panics if `genes.len() > num_nodes`.
pub fn replacement_mutation<R: Rng>(genes: &mut Individual, num_nodes: usize, rng: &mut R) {
    let n = genes.len();
    if n == 0 {
        return;
    }

    let k = rng.random_range(1..=n);
    let mut doomed = vec![false; n];
    for pos in index::sample(rng, n, k).iter() {
        doomed[pos] = true;
    }
    let mut pos = 0;
    genes.retain(|_| {
        let keep = !doomed[pos];
        pos += 1;
        keep
    });

    genes.extend(index::sample(rng, num_nodes, k).iter());
}

// ============================================================================
// Repair
// ============================================================================

/// Replaces repeated members with nodes not present in the individual.
///
/// The first occurrence of each node is kept in place; later occurrences
/// are overwritten with distinct nodes drawn uniformly from the unused ones.
/// Does nothing if the individual is already duplicate-free.
///
/// # Panics
/// Panics if a member is `>= num_nodes`, or if `genes.len() > num_nodes`.
pub fn resample_duplicates<R: Rng>(genes: &mut [usize], num_nodes: usize, rng: &mut R) {
    let mut used = vec![false; num_nodes];
    let mut repeats = Vec::new();
    for (pos, &node) in genes.iter().enumerate() {
        if used[node] {
            repeats.push(pos);
        } else {
            used[node] = true;
        }
    }
    if repeats.is_empty() {
        return;
    }

    let unused: Vec<usize> = (0..num_nodes).filter(|&v| !used[v]).collect();
    let picks = index::sample(rng, unused.len(), repeats.len());
    for (pos, pick) in repeats.into_iter().zip(picks.iter()) {
        genes[pos] = unused[pick];
    }
}

/// Returns `true` if no node appears twice.
pub fn is_distinct(genes: &[usize]) -> bool {
    let mut sorted = genes.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|w| w[0] != w[1])
}

// ============================================================================
// Tests
// ============================================================================
