//! Property tests for the coverage oracle and GA operators.

use proptest::prelude::*;
use u_coverage::ga::operators::{replacement_mutation, splice_crossover};
use u_coverage::ga::{CoverageGa, GaConfig};
use u_coverage::graph::{Graph, Reachability};
use u_coverage::random::create_rng;

/// Random simple graph: up to 12 vertices, each unordered pair present with
/// some probability, weights in [0, 5).
fn arb_graph() -> impl Strategy<Value = Graph> {
    (2usize..12).prop_flat_map(|n| {
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect();
        let len = pairs.len();
        (
            Just(n),
            Just(pairs),
            prop::collection::vec(prop::option::weighted(0.4, 0.0f64..5.0), len),
        )
            .prop_map(|(n, pairs, weights)| {
                let vertices = vec![(0.0, 0.0); n];
                let edges: Vec<(usize, usize, f64)> = pairs
                    .into_iter()
                    .zip(weights)
                    .filter_map(|((a, b), w)| w.map(|w| (a, b, w)))
                    .collect();
                Graph::from_triples(&vertices, &edges).unwrap()
            })
    })
}

proptest! {
    #[test]
    fn coverage_excludes_start(g in arb_graph(), budget in 0.0f64..20.0, seed in any::<u64>()) {
        let start = (seed as usize) % g.num_nodes();
        for mode in [Reachability::BudgetedDfs, Reachability::ShortestPath] {
            let covered = g.coverage_with(start, budget, mode).unwrap();
            prop_assert!(!covered.contains(&start));
            prop_assert!(covered.iter().all(|&v| v < g.num_nodes()));
        }
    }

    #[test]
    fn empty_selection_covers_nothing(g in arb_graph(), budget in 0.0f64..20.0) {
        prop_assert!(g.coverage_of_set(&[], budget).unwrap().is_empty());
    }

    #[test]
    fn dfs_coverage_within_shortest_path_coverage(g in arb_graph(), budget in 0.0f64..20.0) {
        for start in 0..g.num_nodes() {
            let dfs = g.coverage(start, budget).unwrap();
            let sp = g.coverage_with(start, budget, Reachability::ShortestPath).unwrap();
            prop_assert!(dfs.is_subset(&sp));
        }
    }

    #[test]
    fn coverage_monotone_in_budget(g in arb_graph(), low in 0.0f64..10.0, extra in 0.0f64..10.0) {
        for start in 0..g.num_nodes() {
            let small = g.coverage_with(start, low, Reachability::ShortestPath).unwrap();
            let large = g.coverage_with(start, low + extra, Reachability::ShortestPath).unwrap();
            prop_assert!(small.is_subset(&large));
        }
    }

    #[test]
    fn initial_population_shape(
        g in arb_graph(),
        half_pop in 2usize..10,
        subset in 1usize..12,
        seed in any::<u64>(),
    ) {
        let subset = subset.min(g.num_nodes());
        let config = GaConfig::default()
            .with_subset_size(subset)
            .with_distance_budget(1.0)
            .with_population_size(half_pop * 2);
        let ga = CoverageGa::new(&g, config).unwrap();
        let mut rng = create_rng(seed);
        let population = ga.initialize_population(&mut rng);
        prop_assert_eq!(population.len(), half_pop * 2);
        for individual in &population {
            prop_assert_eq!(individual.len(), subset);
            let mut sorted = individual.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), subset);
            prop_assert!(individual.iter().all(|&v| v < g.num_nodes()));
        }
    }

    #[test]
    fn crossover_preserves_length_and_is_deterministic(
        parents in (1usize..8, 1usize..6).prop_flat_map(|(pairs, n)| {
            prop::collection::vec(prop::collection::vec(0usize..50, n), pairs * 2)
        }),
        point in 0usize..8,
    ) {
        let n = parents[0].len();
        let a = splice_crossover(&parents, point);
        let b = splice_crossover(&parents, point);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), parents.len());
        prop_assert!(a.iter().all(|child| child.len() == n));
    }

    #[test]
    fn mutation_preserves_length(
        genes in prop::collection::vec(0usize..30, 1..10),
        seed in any::<u64>(),
    ) {
        let mut mutated = genes.clone();
        let mut rng = create_rng(seed);
        replacement_mutation(&mut mutated, 30, &mut rng);
        prop_assert_eq!(mutated.len(), genes.len());
        prop_assert!(mutated.iter().all(|&v| v < 30));
    }

    #[test]
    fn replace_keeps_top_scores(
        old_fitness in prop::collection::vec(0usize..20, 1..12),
        new_fitness_seed in prop::collection::vec(0usize..20, 12),
    ) {
        let k = old_fitness.len();
        let new_fitness: Vec<usize> = new_fitness_seed[..k].to_vec();
        let old: Vec<Vec<usize>> = (0..k).map(|i| vec![i]).collect();
        let new: Vec<Vec<usize>> = (0..k).map(|i| vec![100 + i]).collect();

        let mut combined: Vec<usize> = old_fitness.iter().chain(&new_fitness).copied().collect();
        combined.sort_unstable_by(|a, b| b.cmp(a));
        let threshold = combined[k - 1];

        let (survivors, fitness) =
            CoverageGa::replace(old, new, old_fitness, new_fitness);
        prop_assert_eq!(survivors.len(), k);
        prop_assert_eq!(fitness.len(), k);
        prop_assert!(fitness.iter().all(|&f| f >= threshold));
        prop_assert!(fitness.windows(2).all(|w| w[0] >= w[1]));
    }
}
