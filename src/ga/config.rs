//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop and
//! the coverage objective it optimizes.

use super::operators::GeneRepair;
use crate::error::ConfigError;
use crate::graph::Reachability;

/// Configuration for the coverage Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_coverage::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 100);
/// assert_eq!(config.tournament_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_coverage::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_subset_size(5)
///     .with_distance_budget(2.5)
///     .with_population_size(60)
///     .with_mutation_rate(0.2)
///     .with_seed(42);
///
/// assert!(config.validate(100).is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population (P).
    ///
    /// Must be even, since parents are recombined pairwise, and at least
    /// `tournament_size`.
    pub population_size: usize,

    /// Number of generations to run (G).
    pub generations: usize,

    /// Probability that an offspring is mutated (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of nodes each individual selects (N).
    pub subset_size: usize,

    /// Distance budget for coverage (D).
    pub distance_budget: f64,

    /// Number of contenders per tournament.
    pub tournament_size: usize,

    /// Coverage semantics used by the fitness function.
    pub reachability: Reachability,

    /// Duplicate handling after crossover and mutation.
    pub repair: GeneRepair,

    /// Number of generations without improvement of the best fitness
    /// before stopping.
    ///
    /// Set to 0 to always run `generations` generations (the default).
    pub stagnation_limit: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked between generations, so a run may exceed the limit by up to
    /// one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            mutation_rate: 0.1,
            subset_size: 1,
            distance_budget: 0.0,
            tournament_size: 3,
            reachability: Reachability::default(),
            repair: GeneRepair::default(),
            stagnation_limit: 0,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation rate.
    ///
    /// Not clamped: out-of-range values are reported by [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of nodes to select.
    pub fn with_subset_size(mut self, n: usize) -> Self {
        self.subset_size = n;
        self
    }

    /// Sets the coverage distance budget.
    pub fn with_distance_budget(mut self, budget: f64) -> Self {
        self.distance_budget = budget;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the coverage semantics.
    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = reachability;
        self
    }

    /// Sets the duplicate handling policy.
    pub fn with_repair(mut self, repair: GeneRepair) -> Self {
        self.repair = repair;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Starting configuration for selecting `subset_size` nodes within
    /// `distance_budget` on a graph of `num_nodes` vertices.
    ///
    /// Search effort grows with the graph:
    ///
    /// | vertices       | population | generations | stagnation limit |
    /// |----------------|------------|-------------|------------------|
    /// | `< 100`        | 40         | 100         | off              |
    /// | `100..1000`    | 100        | 200         | 50               |
    /// | `>= 1000`      | 200        | 400         | 100              |
    ///
    /// ```
    /// use u_coverage::ga::GaConfig;
    ///
    /// let config = GaConfig::for_problem(500, 8, 3.0).with_seed(1);
    /// assert_eq!(config.population_size, 100);
    /// assert_eq!(config.subset_size, 8);
    /// assert!(config.validate(500).is_ok());
    /// ```
    pub fn for_problem(num_nodes: usize, subset_size: usize, distance_budget: f64) -> Self {
        let (population_size, generations, stagnation_limit) = if num_nodes < 100 {
            (40, 100, 0)
        } else if num_nodes < 1000 {
            (100, 200, 50)
        } else {
            (200, 400, 100)
        };
        Self {
            population_size,
            generations,
            stagnation_limit,
            subset_size,
            distance_budget,
            ..Self::default()
        }
    }

    /// Validates the configuration against a graph with `num_nodes` vertices.
    pub fn validate(&self, num_nodes: usize) -> Result<(), ConfigError> {
        if self.subset_size == 0 || self.subset_size > num_nodes {
            return Err(ConfigError::SubsetSize {
                subset_size: self.subset_size,
                num_nodes,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournament);
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulation(self.population_size));
        }
        if self.population_size < self.tournament_size {
            return Err(ConfigError::PopulationBelowTournament {
                population_size: self.population_size,
                tournament_size: self.tournament_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        if self.distance_budget.is_nan() || self.distance_budget < 0.0 {
            return Err(ConfigError::NegativeBudget(self.distance_budget));
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}
