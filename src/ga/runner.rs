//! GA evolutionary loop execution.
//!
//! [`CoverageGa`] exposes each stage of a generation as its own operation and
//! orchestrates them in [`run`](CoverageGa::run):
//! initialization → (evaluation → selection → crossover → mutation →
//! offspring evaluation → replacement) × G.

use super::config::GaConfig;
use super::operators::{replacement_mutation, splice_crossover};
use super::selection::tournament_select;
use super::types::{GenerationObserver, GenerationStats, Individual, Population};
use crate::error::{GaError, GraphError};
use crate::graph::Graph;
use crate::random::rng_from;
use rand::seq::index;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// The best individual of the final population.
    pub best: Individual,

    /// Number of nodes covered by `best`.
    pub best_fitness: usize,

    /// Distinct nodes selected by `best`.
    pub best_nodes: BTreeSet<usize>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run stopped because the best fitness stagnated.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at the wall-clock time limit.
    pub timed_out: bool,

    /// Pre-replacement best fitness of each executed generation.
    pub fitness_history: Vec<usize>,
}

/// Genetic algorithm maximizing distance-bounded node coverage.
///
/// # Usage
///
/// ```
/// use u_coverage::ga::{CoverageGa, GaConfig};
/// use u_coverage::graph::Graph;
///
/// let graph = Graph::from_triples(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
///     &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)],
/// ).unwrap();
///
/// let config = GaConfig::default()
///     .with_subset_size(1)
///     .with_distance_budget(1.0)
///     .with_population_size(10)
///     .with_generations(20)
///     .with_seed(42);
///
/// let ga = CoverageGa::new(&graph, config).unwrap();
/// let result = ga.run().unwrap();
/// assert_eq!(result.best_fitness, 2);
/// ```
#[derive(Debug, Clone)]
pub struct CoverageGa<'g> {
    graph: &'g Graph,
    config: GaConfig,
}

impl<'g> CoverageGa<'g> {
    /// Creates an engine after validating `config` against `graph`.
    ///
    /// # Errors
    /// [`GaError::Config`] if `config` fails [`GaConfig::validate`].
    pub fn new(graph: &'g Graph, config: GaConfig) -> Result<Self, GaError> {
        config.validate(graph.num_nodes())?;
        Ok(Self { graph, config })
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Creates P individuals, each N distinct nodes sampled uniformly.
    pub fn initialize_population<R: Rng>(&self, rng: &mut R) -> Population {
        let num_nodes = self.graph.num_nodes();
        (0..self.config.population_size)
            .map(|_| index::sample(rng, num_nodes, self.config.subset_size).into_vec())
            .collect()
    }

    /// Number of nodes covered by one individual.
    pub fn fitness(&self, individual: &[usize]) -> Result<usize, GraphError> {
        self.graph.coverage_count(
            individual,
            self.config.distance_budget,
            self.config.reachability,
        )
    }

    /// Fitness of every individual, in population order.
    pub fn evaluate(&self, population: &[Individual]) -> Result<Vec<usize>, GraphError> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return population
                    .par_iter()
                    .map(|individual| self.fitness(individual))
                    .collect();
            }
        }

        population
            .iter()
            .map(|individual| self.fitness(individual))
            .collect()
    }

    /// Picks P parents by tournament.
    pub fn select<R: Rng>(
        &self,
        population: &[Individual],
        fitness: &[usize],
        rng: &mut R,
    ) -> Population {
        tournament_select(population, fitness, self.config.tournament_size, rng)
    }

    /// Recombines parents pairwise around one crossover point drawn
    /// uniformly from `0..=N` for the whole generation.
    ///
    /// # Panics
    /// Panics if the number of parents is odd.
    pub fn crossover<R: Rng>(&self, parents: &[Individual], rng: &mut R) -> Population {
        let point = rng.random_range(0..=self.config.subset_size);
        let mut offspring = splice_crossover(parents, point);
        for child in &mut offspring {
            self.config.repair.apply(child, self.graph.num_nodes(), rng);
        }
        offspring
    }

    /// Mutates each individual with probability `mutation_rate`.
    pub fn mutate<R: Rng>(&self, mut offspring: Population, rng: &mut R) -> Population {
        let num_nodes = self.graph.num_nodes();
        for individual in &mut offspring {
            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                replacement_mutation(individual, num_nodes, rng);
                self.config.repair.apply(individual, num_nodes, rng);
            }
        }
        offspring
    }

    /// Elitist merge-and-truncate.
    ///
    /// Pools both generations, orders them by fitness (descending, stable:
    /// on ties the old individual comes first) and keeps the first
    /// `old.len()`. Returns the survivors with their fitness, best first.
    ///
    /// # Panics
    /// Panics if a fitness sequence is not parallel to its population.
    pub fn replace(
        old: Population,
        new: Population,
        old_fitness: Vec<usize>,
        new_fitness: Vec<usize>,
    ) -> (Population, Vec<usize>) {
        assert_eq!(old.len(), old_fitness.len(), "old fitness must be parallel");
        assert_eq!(new.len(), new_fitness.len(), "new fitness must be parallel");

        let keep = old.len();
        let mut pool: Vec<(Individual, usize)> = old
            .into_iter()
            .zip(old_fitness)
            .chain(new.into_iter().zip(new_fitness))
            .collect();
        pool.sort_by(|a, b| b.1.cmp(&a.1));
        pool.truncate(keep);
        pool.into_iter().unzip()
    }

    /// Runs the GA.
    pub fn run(&self) -> Result<GaResult, GaError> {
        self.run_with(&mut |_: &GenerationStats| {}, None)
    }

    /// Runs the GA, reporting each generation to `observer`.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation starts and returns the best solution of
    /// the current population.
    ///
    /// The returned best individual is the argmax of the final population
    /// under fitness carried through replacement, so `best_fitness` always
    /// matches `best`.
    pub fn run_with<O>(
        &self,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult, GaError>
    where
        O: GenerationObserver + ?Sized,
    {
        let config = &self.config;
        let started = Instant::now();
        let mut rng = rng_from(config.seed);

        info!(
            num_nodes = self.graph.num_nodes(),
            subset_size = config.subset_size,
            distance_budget = config.distance_budget,
            population_size = config.population_size,
            generations = config.generations,
            "starting coverage GA"
        );

        let mut population = self.initialize_population(&mut rng);
        let mut fitness = self.evaluate(&population)?;

        let mut fitness_history = Vec::with_capacity(config.generations);
        let mut best_so_far = max_fitness(&fitness);
        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut cancelled = false;
        let mut timed_out = false;
        let mut stagnated = false;

        for gen in 0..config.generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!(generation = gen, "coverage GA cancelled");
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    warn!(generation = gen, limit_ms = limit, "coverage GA hit time limit");
                    timed_out = true;
                    break;
                }
            }

            let parents = self.select(&population, &fitness, &mut rng);
            let offspring = self.crossover(&parents, &mut rng);
            let offspring = self.mutate(offspring, &mut rng);
            let offspring_fitness = self.evaluate(&offspring)?;

            let stats = GenerationStats {
                generation: gen + 1,
                best_fitness: max_fitness(&fitness),
                offspring_best_fitness: max_fitness(&offspring_fitness),
                mean_fitness: mean_fitness(&fitness),
            };
            debug!(
                generation = stats.generation,
                best_fitness = stats.best_fitness,
                offspring_best_fitness = stats.offspring_best_fitness,
                "generation complete"
            );
            observer.on_generation(&stats);
            fitness_history.push(stats.best_fitness);

            (population, fitness) =
                Self::replace(population, offspring, fitness, offspring_fitness);
            generations = gen + 1;

            let current_best = max_fitness(&fitness);
            if current_best > best_so_far {
                best_so_far = current_best;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                debug!(generation = generations, "best fitness stagnated");
                stagnated = true;
                break;
            }
        }

        let best_idx = best_index(&fitness);
        let best = population.swap_remove(best_idx);
        let best_fitness = fitness[best_idx];

        info!(
            best_fitness,
            generations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "coverage GA finished"
        );

        Ok(GaResult {
            best_nodes: best.iter().copied().collect(),
            best,
            best_fitness,
            generations,
            stagnated,
            cancelled,
            timed_out,
            fitness_history,
        })
    }
}

fn max_fitness(fitness: &[usize]) -> usize {
    fitness.iter().copied().max().unwrap_or(0)
}

fn mean_fitness(fitness: &[usize]) -> f64 {
    if fitness.is_empty() {
        return 0.0;
    }
    fitness.iter().sum::<usize>() as f64 / fitness.len() as f64
}

/// Index of the first maximum.
fn best_index(fitness: &[usize]) -> usize {
    fitness
        .iter()
        .enumerate()
        .fold(0, |best, (i, &f)| if f > fitness[best] { i } else { best })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::ga::operators::{is_distinct, GeneRepair};
    use crate::graph::Reachability;
    use crate::random::create_rng;

    fn path(n: usize) -> Graph {
        let vertices: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, 0.0)).collect();
        let edges: Vec<(usize, usize, f64)> = (0..n - 1).map(|i| (i, i + 1, 1.0)).collect();
        Graph::from_triples(&vertices, &edges).unwrap()
    }

    fn config(subset_size: usize, budget: f64) -> GaConfig {
        GaConfig::default()
            .with_subset_size(subset_size)
            .with_distance_budget(budget)
            .with_population_size(20)
            .with_generations(30)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let g = path(5);
        let err = CoverageGa::new(&g, config(6, 1.0)).unwrap_err();
        assert_eq!(
            err,
            GaError::Config(ConfigError::SubsetSize {
                subset_size: 6,
                num_nodes: 5
            })
        );
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_initialize_population_shape() {
        let g = path(10);
        let ga = CoverageGa::new(&g, config(4, 1.0)).unwrap();
        let mut rng = create_rng(1);
        let population = ga.initialize_population(&mut rng);
        assert_eq!(population.len(), 20);
        for individual in &population {
            assert_eq!(individual.len(), 4);
            assert!(is_distinct(individual));
            assert!(individual.iter().all(|&v| v < 10));
        }
    }

    #[test]
    fn test_evaluate_preserves_order() {
        let g = path(5);
        let ga = CoverageGa::new(&g, config(1, 1.0)).unwrap();
        let population = vec![vec![0], vec![2], vec![4], vec![1]];
        assert_eq!(ga.evaluate(&population).unwrap(), vec![1, 2, 1, 2]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let g = path(50);
        let sequential = CoverageGa::new(&g, config(5, 3.0)).unwrap();
        let parallel = CoverageGa::new(&g, config(5, 3.0).with_parallel(true)).unwrap();
        let mut rng = create_rng(8);
        let population = sequential.initialize_population(&mut rng);
        assert_eq!(
            sequential.evaluate(&population).unwrap(),
            parallel.evaluate(&population).unwrap()
        );
    }

    #[test]
    fn test_evaluate_counts_duplicates_once() {
        let g = path(5);
        let ga = CoverageGa::new(&g, config(2, 1.0)).unwrap();
        assert_eq!(ga.evaluate(&[vec![2, 2]]).unwrap(), vec![2]);
    }

    #[test]
    fn test_evaluate_unknown_node_fails() {
        let g = path(5);
        let ga = CoverageGa::new(&g, config(1, 1.0)).unwrap();
        assert!(matches!(
            ga.evaluate(&[vec![9]]),
            Err(GraphError::UnknownNode { node: 9, .. })
        ));
    }

    #[test]
    fn test_select_size() {
        let g = path(10);
        let ga = CoverageGa::new(&g, config(2, 1.0)).unwrap();
        let mut rng = create_rng(3);
        let population = ga.initialize_population(&mut rng);
        let fitness = ga.evaluate(&population).unwrap();
        let parents = ga.select(&population, &fitness, &mut rng);
        assert_eq!(parents.len(), population.len());
    }

    #[test]
    fn test_crossover_and_mutate_preserve_length() {
        let g = path(12);
        let ga = CoverageGa::new(&g, config(5, 1.0).with_mutation_rate(1.0)).unwrap();
        let mut rng = create_rng(4);
        let population = ga.initialize_population(&mut rng);
        let offspring = ga.crossover(&population, &mut rng);
        assert_eq!(offspring.len(), population.len());
        let mutated = ga.mutate(offspring, &mut rng);
        assert_eq!(mutated.len(), population.len());
        assert!(mutated.iter().all(|ind| ind.len() == 5));
    }

    #[test]
    fn test_zero_mutation_rate_passes_through() {
        let g = path(12);
        let ga = CoverageGa::new(&g, config(3, 1.0).with_mutation_rate(0.0)).unwrap();
        let mut rng = create_rng(4);
        let population = ga.initialize_population(&mut rng);
        assert_eq!(ga.mutate(population.clone(), &mut rng), population);
    }

    #[test]
    fn test_resample_keeps_individuals_distinct() {
        let g = path(8);
        let ga = CoverageGa::new(
            &g,
            config(6, 1.0)
                .with_mutation_rate(1.0)
                .with_repair(GeneRepair::Resample),
        )
        .unwrap();
        let mut rng = create_rng(12);
        let mut population = ga.initialize_population(&mut rng);
        for _ in 0..20 {
            let offspring = ga.crossover(&population, &mut rng);
            population = ga.mutate(offspring, &mut rng);
            for individual in &population {
                assert_eq!(individual.len(), 6);
                assert!(is_distinct(individual), "duplicates in {individual:?}");
            }
        }
    }

    #[test]
    fn test_replace_keeps_fittest() {
        let old = vec![vec![0], vec![1], vec![2]];
        let new = vec![vec![3], vec![4], vec![5]];
        let (survivors, fitness) =
            CoverageGa::replace(old, new, vec![8, 6, 9], vec![7, 5, 8]);
        assert_eq!(survivors, vec![vec![2], vec![0], vec![5]]);
        assert_eq!(fitness, vec![9, 8, 8]);
    }

    #[test]
    fn test_replace_child_can_displace_all_parents() {
        let (survivors, fitness) = CoverageGa::replace(
            vec![vec![0], vec![1]],
            vec![vec![2], vec![3]],
            vec![1, 1],
            vec![5, 4],
        );
        assert_eq!(survivors, vec![vec![2], vec![3]]);
        assert_eq!(fitness, vec![5, 4]);
    }

    #[test]
    fn test_replace_ties_prefer_old() {
        let (survivors, _) = CoverageGa::replace(
            vec![vec![0], vec![1]],
            vec![vec![2], vec![3]],
            vec![3, 3],
            vec![3, 3],
        );
        assert_eq!(survivors, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_run_path_graph_finds_interior_node() {
        let g = path(5);
        let ga = CoverageGa::new(&g, config(1, 1.0)).unwrap();
        let result = ga.run().unwrap();
        assert_eq!(result.best_fitness, 2);
        assert!([1, 2, 3].contains(&result.best[0]));
        assert_eq!(result.generations, 30);
        assert_eq!(result.fitness_history.len(), 30);
    }

    #[test]
    fn test_best_fitness_matches_best_individual() {
        let g = path(30);
        let ga = CoverageGa::new(&g, config(3, 2.0)).unwrap();
        let result = ga.run().unwrap();
        assert_eq!(result.best_fitness, ga.fitness(&result.best).unwrap());
        assert_eq!(
            result.best_nodes,
            result.best.iter().copied().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_history_is_non_decreasing() {
        let g = path(40);
        let ga = CoverageGa::new(&g, config(3, 2.0).with_generations(50)).unwrap();
        let result = ga.run().unwrap();
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "elitist replacement should never lose the best: {:?}",
                result.fitness_history
            );
        }
        assert!(result.best_fitness >= *result.fitness_history.last().unwrap());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let g = path(25);
        let ga = CoverageGa::new(&g, config(3, 1.5).with_mutation_rate(0.4)).unwrap();
        let a = ga.run().unwrap();
        let b = ga.run().unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_observer_receives_every_generation() {
        let g = path(10);
        let ga = CoverageGa::new(&g, config(2, 1.0).with_generations(12)).unwrap();
        let mut records = Vec::new();
        let result = ga
            .run_with(&mut |stats: &GenerationStats| records.push(stats.clone()), None)
            .unwrap();
        assert_eq!(records.len(), 12);
        for (i, stats) in records.iter().enumerate() {
            assert_eq!(stats.generation, i + 1);
            assert!(stats.mean_fitness <= stats.best_fitness as f64);
        }
        let history: Vec<usize> = records.iter().map(|s| s.best_fitness).collect();
        assert_eq!(history, result.fitness_history);
    }

    #[test]
    fn test_cancel_before_start() {
        let g = path(10);
        let ga = CoverageGa::new(&g, config(2, 1.0)).unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = ga.run_with(&mut |_: &GenerationStats| {}, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.fitness_history.is_empty());
        assert_eq!(result.best.len(), 2);
    }

    #[test]
    fn test_cancel_from_observer() {
        let g = path(10);
        let ga = CoverageGa::new(&g, config(2, 1.0).with_generations(1000)).unwrap();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        let mut observer = |stats: &GenerationStats| {
            if stats.generation == 5 {
                flag.store(true, Ordering::Relaxed);
            }
        };
        let result = ga.run_with(&mut observer, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_stagnation_stops_early() {
        // Full subset: every individual already covers everything reachable
        let g = path(6);
        let ga = CoverageGa::new(
            &g,
            config(6, 1.0)
                .with_generations(500)
                .with_stagnation_limit(5),
        )
        .unwrap();
        let result = ga.run().unwrap();
        assert!(result.stagnated);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_shortest_path_mode_runs() {
        let g = Graph::from_triples(
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 0.0)],
            &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.5), (2, 3, 0.5)],
        )
        .unwrap();
        let ga = CoverageGa::new(
            &g,
            config(1, 2.0)
                .with_population_size(4)
                .with_reachability(Reachability::ShortestPath),
        )
        .unwrap();
        assert_eq!(ga.fitness(&[0]).unwrap(), 3);
        assert_eq!(ga.run().unwrap().best_fitness, 3);
    }

    #[test]
    fn test_best_index_first_max() {
        assert_eq!(best_index(&[1, 5, 3, 5]), 1);
        assert_eq!(best_index(&[0, 0, 0]), 0);
    }
}
