//! Configuration for the profiling engine.
//!
//! Nested per-component sections with sensible defaults, TOML load/save,
//! and validation. All thresholds that drive verdicts (sybil similarity,
//! graph edge minimum, clustering caps) live here so operators can tune them
//! without touching code.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::errors::{ProfilerError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilerConfig {
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub sybil: SybilConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Feature extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// How many top hours-of-day to keep as "preferred".
    pub preferred_hours: usize,
    /// How many top days-of-week to keep as "preferred".
    pub preferred_days: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { preferred_hours: 3, preferred_days: 2 }
    }
}

/// K-means clustering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Fixed cluster count; `None` derives `min(ceil(sqrt(n/2)), max_clusters)`.
    pub cluster_count: Option<usize>,
    /// Hard cap on assign/recompute rounds; guarantees termination.
    pub max_iterations: usize,
    /// Upper bound on the derived cluster count.
    pub max_clusters: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self { cluster_count: None, max_iterations: 100, max_clusters: 50 }
    }
}

/// Sybil detector thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SybilConfig {
    /// Cosine similarity above which two wallets count as related.
    pub similarity_threshold: f64,
    /// Shared preferred hours needed for the temporal-correlation signal.
    pub shared_hours_min: usize,
    /// Common counterparties needed for the shared-counterparty signal.
    pub shared_counterparties_min: usize,
    /// Relative average-value difference below which funding counts as similar.
    pub funding_delta_pct: f64,
    /// Suspicion score above which a wallet is flagged as sybil.
    pub sybil_score_threshold: f64,
    /// Suspicion score above which an attack pattern is assigned.
    pub pattern_score_threshold: f64,
    /// Cap on the related-wallet list.
    pub max_related_wallets: usize,
}

impl Default for SybilConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            shared_hours_min: 2,
            shared_counterparties_min: 3,
            funding_delta_pct: 0.10,
            sybil_score_threshold: 60.0,
            pattern_score_threshold: 80.0,
            max_related_wallets: 10,
        }
    }
}

/// Interaction-graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Minimum interaction count for an edge to exist.
    pub min_interactions: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { min_interactions: 2 }
    }
}

impl ProfilerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProfilerError::Configuration(format!("read config: {e}")))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as TOML.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)
            .map_err(|e| ProfilerError::Configuration(format!("write config: {e}")))?;
        Ok(())
    }

    /// Reject values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.features.preferred_hours == 0 || self.features.preferred_days == 0 {
            return Err(ProfilerError::InvalidParameter(
                "preferred_hours and preferred_days must be > 0".into(),
            ));
        }
        if self.clustering.max_iterations == 0 {
            return Err(ProfilerError::InvalidParameter("max_iterations must be > 0".into()));
        }
        if self.clustering.max_clusters == 0 {
            return Err(ProfilerError::InvalidParameter("max_clusters must be > 0".into()));
        }
        if let Some(0) = self.clustering.cluster_count {
            return Err(ProfilerError::InvalidParameter("cluster_count must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.sybil.similarity_threshold) {
            return Err(ProfilerError::InvalidParameter(
                "similarity_threshold must be within [0, 1]".into(),
            ));
        }
        if self.sybil.funding_delta_pct < 0.0 {
            return Err(ProfilerError::InvalidParameter(
                "funding_delta_pct must be >= 0".into(),
            ));
        }
        if self.graph.min_interactions == 0 {
            return Err(ProfilerError::InvalidParameter("min_interactions must be > 0".into()));
        }
        Ok(())
    }
}
