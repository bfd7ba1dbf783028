use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};

use defi_wallet_profiler::cli::{Cli, Commands};
use defi_wallet_profiler::service::{TransactionBatch, WalletProfiler};
use defi_wallet_profiler::ProfilerConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ProfilerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ProfilerConfig::default(),
    };

    match cli.command {
        Commands::Analyze { input, seed } => {
            let batch = read_batch(&input)?;
            let profiler = WalletProfiler::new(config)?;
            let report = match seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    profiler.analyze_with_rng(&batch, &mut rng)?
                }
                None => profiler.analyze(&batch)?,
            };
            write_json(cli.output.as_deref(), &report)?;
        }
        Commands::Cluster { input, k, seed } => {
            let batch = read_batch(&input)?;
            let mut config = config;
            if k.is_some() {
                config.clustering.cluster_count = k;
            }
            let profiler = WalletProfiler::new(config)?;
            let population = profiler.profile_wallets(&batch);
            let clusters = match seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    profiler.cluster_population_with_rng(&population.wallets, &mut rng)?
                }
                None => profiler.cluster_population(&population.wallets)?,
            };
            write_json(cli.output.as_deref(), &clusters)?;
        }
        Commands::Sybil { input, target } => {
            let batch = read_batch(&input)?;
            let profiler = WalletProfiler::new(config)?;
            let population = profiler.profile_wallets(&batch);
            let report = profiler.detect_sybil(&target, &population.wallets)?;
            write_json(cli.output.as_deref(), &report)?;
        }
        Commands::Graph { input } => {
            let batch = read_batch(&input)?;
            let profiler = WalletProfiler::new(config)?;
            let population = profiler.profile_wallets(&batch);
            let graph = profiler.build_graph(&population.wallets);
            write_json(cli.output.as_deref(), &graph)?;
        }
        Commands::Classify { input, target } => {
            let batch = read_batch(&input)?;
            let profiler = WalletProfiler::new(config)?;
            let population = profiler.profile_wallets(&batch);
            let wallet = population
                .wallets
                .iter()
                .find(|w| w.address.eq_ignore_ascii_case(&target))
                .with_context(|| format!("no profiled wallet named {target}"))?;
            let profile = profiler.classify(wallet);
            write_json(cli.output.as_deref(), &profile)?;
        }
    }

    Ok(())
}

fn read_batch(path: &PathBuf) -> anyhow::Result<TransactionBatch> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let batch: TransactionBatch = serde_json::from_str(&raw)
        .with_context(|| format!("parsing transaction batch from {}", path.display()))?;
    Ok(batch)
}

fn write_json<T: Serialize>(output: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
