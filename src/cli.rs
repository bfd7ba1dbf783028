use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wallet profiler CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(
    name = "profiler-cli",
    about = "Behavioral wallet clustering and sybil detection",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Optional TOML config overriding the engine defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write JSON output to this path instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Full report: clusters, graph, classifications, sybil analyses
    Analyze {
        /// JSON file of {address: [transaction records]}
        #[arg(long)]
        input: PathBuf,
        /// Seed for reproducible clustering
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Behavioral clusters only
    Cluster {
        #[arg(long)]
        input: PathBuf,
        /// Fixed cluster count (derived from population size if omitted)
        #[arg(long)]
        k: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Sybil-check one target wallet against the population
    Sybil {
        #[arg(long)]
        input: PathBuf,
        /// Target wallet address
        #[arg(long)]
        target: String,
    },
    /// Interaction graph with communities
    Graph {
        #[arg(long)]
        input: PathBuf,
    },
    /// Classify a single wallet's behavior
    Classify {
        #[arg(long)]
        input: PathBuf,
        /// Wallet address to classify
        #[arg(long)]
        target: String,
    },
}
