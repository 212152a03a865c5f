//! Core types shared by the GA operators and runner.

/// A candidate selection: a fixed-length list of node indices.
///
/// Order matters to crossover (list splice); coverage only looks at the
/// distinct members.
pub type Individual = Vec<usize>;

/// An ordered sequence of individuals, paired by position with a fitness
/// sequence.
pub type Population = Vec<Individual>;

/// Per-generation progress record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 1-based generation index.
    pub generation: usize,

    /// Best fitness of the population entering this generation, i.e. before
    /// replacement.
    pub best_fitness: usize,

    /// Best fitness among this generation's offspring.
    pub offspring_best_fitness: usize,

    /// Mean fitness of the population entering this generation.
    pub mean_fitness: f64,
}

/// Receives one [`GenerationStats`] record per completed generation.
///
/// Implemented for any `FnMut(&GenerationStats)`, so a closure can be passed
/// directly:
///
/// ```
/// use u_coverage::ga::{GenerationObserver, GenerationStats};
///
/// let mut seen = Vec::new();
/// let mut observer = |stats: &GenerationStats| seen.push(stats.best_fitness);
/// observer.on_generation(&GenerationStats {
///     generation: 1,
///     best_fitness: 3,
///     offspring_best_fitness: 2,
///     mean_fitness: 1.5,
/// });
/// assert_eq!(seen, vec![3]);
/// ```
pub trait GenerationObserver {
    fn on_generation(&mut self, stats: &GenerationStats);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationStats),
{
    fn on_generation(&mut self, stats: &GenerationStats) {
        self(stats)
    }
}
