//! Command-line front end: load a graph file, run the coverage GA, report
//! the best selection.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_coverage::ga::{CoverageGa, GaConfig, GeneRepair, GenerationStats};
use u_coverage::graph::{load_graph, Reachability};

#[derive(Parser)]
#[command(name = "u-coverage")]
#[command(about = "Select N graph nodes maximizing coverage within a distance budget")]
#[command(version)]
struct Cli {
    /// Path to graph '*.txt' file
    #[arg(short, long = "in-file")]
    in_file: PathBuf,

    /// Number of nodes to select
    #[arg(short = 'n', long = "nb-nodes")]
    nb_nodes: usize,

    /// Distance to nearest selected node to be considered as covered
    #[arg(short, long)]
    distance: f64,

    /// Population size (even, at least the tournament size) [default: sized to the graph]
    #[arg(long)]
    population_size: Option<usize>,

    /// Number of generations [default: sized to the graph]
    #[arg(short, long)]
    generations: Option<usize>,

    /// Probability of mutating each offspring
    #[arg(short, long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Tournament size for parent selection
    #[arg(long, default_value_t = 3)]
    tournament_size: usize,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Count nodes by shortest-path distance instead of budgeted DFS
    #[arg(long)]
    shortest_path: bool,

    /// Duplicate handling after crossover and mutation
    #[arg(long, value_enum, default_value_t = RepairArg::Tolerate)]
    repair: RepairArg,

    /// Stop after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Evaluate fitness on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepairArg {
    Tolerate,
    Resample,
}

impl From<RepairArg> for GeneRepair {
    fn from(arg: RepairArg) -> Self {
        match arg {
            RepairArg::Tolerate => GeneRepair::Tolerate,
            RepairArg::Resample => GeneRepair::Resample,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("u_coverage=info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        file = %cli.in_file.display(),
        n = cli.nb_nodes,
        d = cli.distance,
        "loading graph"
    );
    let graph = load_graph(&cli.in_file)
        .with_context(|| format!("failed to load graph {}", cli.in_file.display()))?;
    info!(
        vertices = graph.num_nodes(),
        edges = graph.num_edges(),
        "graph loaded"
    );

    let reachability = if cli.shortest_path {
        Reachability::ShortestPath
    } else {
        Reachability::BudgetedDfs
    };
    let mut config = GaConfig::for_problem(graph.num_nodes(), cli.nb_nodes, cli.distance)
        .with_mutation_rate(cli.mutation_rate)
        .with_tournament_size(cli.tournament_size)
        .with_reachability(reachability)
        .with_repair(cli.repair.into())
        .with_parallel(!cli.sequential);
    if let Some(size) = cli.population_size {
        config = config.with_population_size(size);
    }
    if let Some(generations) = cli.generations {
        config = config.with_generations(generations);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(ms) = cli.time_limit_ms {
        config = config.with_time_limit_ms(ms);
    }

    let ga = CoverageGa::new(&graph, config).context("invalid algorithm settings")?;

    let started = Instant::now();
    let mut report = |stats: &GenerationStats| {
        info!(
            generation = stats.generation,
            covered = stats.best_fitness,
            "generation"
        );
    };
    let result = ga.run_with(&mut report, None)?;
    let elapsed = started.elapsed();

    let fraction = graph.coverage_fraction(&result.best, cli.distance, reachability)?;
    let nodes: Vec<String> = result.best_nodes.iter().map(|n| n.to_string()).collect();

    println!("Selected nodes: {}", nodes.join(" "));
    println!(
        "Covered nodes: {} / {} ({:.1}%)",
        result.best_fitness,
        graph.num_nodes(),
        fraction * 100.0
    );
    println!("Generations: {}", result.generations);
    println!("Time taken: {:.3} seconds", elapsed.as_secs_f64());

    Ok(())
}
