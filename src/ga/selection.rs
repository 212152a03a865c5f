//! Tournament selection.
//!
//! Fitness is coverage cardinality, so **higher is better** throughout.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::{Individual, Population};
use rand::seq::index;
use rand::Rng;

/// Runs one tournament and returns the winner's index.
///
/// Draws `k` distinct indices uniformly from `0..fitness.len()` and returns
/// the one with the highest fitness. Ties go to the contender drawn first.
/// `k` is capped at the population size.
///
/// # Complexity
/// O(k) per tournament
///
/// # Panics
/// Panics if `fitness` is empty.
pub fn tournament<R: Rng>(fitness: &[usize], k: usize, rng: &mut R) -> usize {
    assert!(!fitness.is_empty(), "cannot select from empty population");

    let n = fitness.len();
    let contenders = index::sample(rng, n, k.clamp(1, n));

    let mut winner = contenders.index(0);
    for idx in contenders.iter().skip(1) {
        if fitness[idx] > fitness[winner] {
            winner = idx;
        }
    }
    winner
}

/// Selects `population.len()` parents by independent tournaments.
///
/// Each output slot runs its own tournament, so the same individual may be
/// selected for several slots.
///
/// # Panics
/// Panics if `population` is empty or if `fitness` is not parallel to it.
pub fn tournament_select<R: Rng>(
    population: &[Individual],
    fitness: &[usize],
    tournament_size: usize,
    rng: &mut R,
) -> Population {
    assert_eq!(
        population.len(),
        fitness.len(),
        "fitness must be parallel to population"
    );

    (0..population.len())
        .map(|_| population[tournament(fitness, tournament_size, rng)].clone())
        .collect()
}
