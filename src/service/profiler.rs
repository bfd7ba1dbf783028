//! Batch façade over the analysis components.
//!
//! `WalletProfiler` is instantiated fresh per call site and holds only
//! configuration, so concurrent invocations never share mutable state. Batch
//! extraction skips wallets that fail (empty transaction lists) and reports
//! them instead of aborting the run.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::analysis::{
    classifier, clustering::KMeansClusterer, features::FeatureExtractor,
    graph::NetworkGraphBuilder, sybil::SybilDetector,
};
use crate::config::ProfilerConfig;
use crate::core::errors::{ProfilerError, Result};
use crate::core::types::{
    BehaviorProfile, Cluster, NetworkGraph, SybilAnalysis, TransactionRecord,
    WalletFeatureVector,
};

/// Transaction lists keyed by wallet address.
pub type TransactionBatch = BTreeMap<String, Vec<TransactionRecord>>;

/// Result of batch feature extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationProfile {
    pub wallets: Vec<WalletFeatureVector>,
    /// Addresses skipped because extraction failed, with the reason.
    pub skipped: Vec<SkippedWallet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedWallet {
    pub address: String,
    pub reason: String,
}

/// Full population report: everything the engine can say about a batch,
/// serializable to JSON for a consuming layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub clusters: Vec<Cluster>,
    pub graph: NetworkGraph,
    pub classifications: BTreeMap<String, BehaviorProfile>,
    pub sybil_analyses: BTreeMap<String, SybilAnalysis>,
    pub skipped: Vec<SkippedWallet>,
}

pub struct WalletProfiler {
    config: ProfilerConfig,
}

impl WalletProfiler {
    pub fn new(config: ProfilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self { config: ProfilerConfig::default() }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Extract a profile for every wallet in the batch, skipping failures.
    pub fn profile_wallets(&self, batch: &TransactionBatch) -> PopulationProfile {
        self.profile_wallets_at(batch, Utc::now().timestamp())
    }

    /// Batch extraction with an explicit "now" timestamp.
    pub fn profile_wallets_at(&self, batch: &TransactionBatch, now: i64) -> PopulationProfile {
        let extractor = FeatureExtractor::new(self.config.features.clone());
        let mut wallets = Vec::with_capacity(batch.len());
        let mut skipped = Vec::new();

        for (address, transactions) in batch {
            match extractor.extract_at(address, transactions, now) {
                Ok(vector) => wallets.push(vector),
                Err(e) => {
                    warn!(address = %address, error = %e, "skipping wallet");
                    skipped.push(SkippedWallet {
                        address: address.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            profiled = wallets.len(),
            skipped = skipped.len(),
            "batch extraction finished"
        );
        PopulationProfile { wallets, skipped }
    }

    /// Cluster a profiled population (unseeded RNG).
    pub fn cluster_population(&self, wallets: &[WalletFeatureVector]) -> Result<Vec<Cluster>> {
        KMeansClusterer::new(self.config.clustering.clone()).cluster(wallets)
    }

    /// Cluster with a caller-supplied RNG for reproducible runs.
    pub fn cluster_population_with_rng<R: Rng>(
        &self,
        wallets: &[WalletFeatureVector],
        rng: &mut R,
    ) -> Result<Vec<Cluster>> {
        KMeansClusterer::new(self.config.clustering.clone()).cluster_with_rng(wallets, rng)
    }

    /// Sybil-check one target address against the profiled population.
    pub fn detect_sybil(
        &self,
        target: &str,
        population: &[WalletFeatureVector],
    ) -> Result<SybilAnalysis> {
        let target_vector = population
            .iter()
            .find(|w| w.address.eq_ignore_ascii_case(target))
            .ok_or_else(|| {
                ProfilerError::InvalidParameter(format!("unknown target wallet: {target}"))
            })?;
        Ok(SybilDetector::new(self.config.sybil.clone()).analyze(target_vector, population))
    }

    /// Build the interaction graph for a profiled population.
    pub fn build_graph(&self, wallets: &[WalletFeatureVector]) -> NetworkGraph {
        NetworkGraphBuilder::new(self.config.graph.clone()).build(wallets)
    }

    /// Classify one wallet's behavior.
    pub fn classify(&self, wallet: &WalletFeatureVector) -> BehaviorProfile {
        classifier::classify(wallet)
    }

    /// Full report over a raw transaction batch: extraction, clustering,
    /// graph, per-wallet classification, and per-wallet sybil analysis.
    pub fn analyze(&self, batch: &TransactionBatch) -> Result<AnalysisReport> {
        self.analyze_with_rng(batch, &mut rand::thread_rng())
    }

    pub fn analyze_with_rng<R: Rng>(
        &self,
        batch: &TransactionBatch,
        rng: &mut R,
    ) -> Result<AnalysisReport> {
        let population = self.profile_wallets(batch);
        let clusters = self.cluster_population_with_rng(&population.wallets, rng)?;
        let graph = self.build_graph(&population.wallets);

        let detector = SybilDetector::new(self.config.sybil.clone());
        let mut classifications = BTreeMap::new();
        let mut sybil_analyses = BTreeMap::new();
        for wallet in &population.wallets {
            classifications.insert(wallet.address.clone(), classifier::classify(wallet));
            sybil_analyses.insert(
                wallet.address.clone(),
                detector.analyze(wallet, &population.wallets),
            );
        }

        Ok(AnalysisReport {
            clusters,
            graph,
            classifications,
            sybil_analyses,
            skipped: population.skipped,
        })
    }
}
