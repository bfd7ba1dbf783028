//! K-means behavioral clustering with K-means++ seeding.
//!
//! Partitions batch-normalized wallet profiles into behavioral clusters.
//! Seeding is randomized, so repeated runs over identical input may produce
//! different (statistically similar) partitions; callers needing
//! reproducibility inject a seeded `Rng` through `cluster_with_rng`.

use rand::Rng;
use tracing::{debug, warn};

use crate::analysis::classifier::{classify_inputs, BehaviorInputs};
use crate::analysis::normalize::normalize_batch;
use crate::analysis::similarity::euclidean_distance;
use crate::config::ClusteringConfig;
use crate::core::errors::{ProfilerError, Result};
use crate::core::types::{Cluster, ClusterCharacteristics, WalletFeatureVector};

pub struct KMeansClusterer {
    config: ClusteringConfig,
}

impl KMeansClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Cluster with an unseeded RNG. Non-deterministic across runs.
    pub fn cluster(&self, wallets: &[WalletFeatureVector]) -> Result<Vec<Cluster>> {
        self.cluster_with_rng(wallets, &mut rand::thread_rng())
    }

    /// Cluster with a caller-supplied random source.
    pub fn cluster_with_rng<R: Rng>(
        &self,
        wallets: &[WalletFeatureVector],
        rng: &mut R,
    ) -> Result<Vec<Cluster>> {
        let n = wallets.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let k = self.resolve_k(n)?;
        let points = normalize_batch(wallets);
        let dim = points[0].len();

        let mut centroids = seed_centroids_plus_plus(&points, k, rng);
        let mut assignments = vec![0usize; n];

        for round in 0..self.config.max_iterations {
            let next: Vec<usize> = points
                .iter()
                .map(|p| nearest_centroid(p, &centroids))
                .collect();

            let converged = round > 0 && next == assignments;
            assignments = next;
            if converged {
                debug!(round, "k-means assignments stabilized");
                break;
            }

            // Recompute centroids as member means. An empty cluster keeps a
            // zero-vector centroid for the round rather than being re-seeded;
            // retained behavior from the original engine.
            let mut sums = vec![vec![0.0f64; dim]; k];
            let mut counts = vec![0usize; k];
            for (point, &slot) in points.iter().zip(assignments.iter()) {
                counts[slot] += 1;
                for (d, value) in point.iter().enumerate() {
                    sums[slot][d] += value;
                }
            }
            for slot in 0..k {
                if counts[slot] == 0 {
                    centroids[slot] = vec![0.0; dim];
                } else {
                    for d in 0..dim {
                        centroids[slot][d] = sums[slot][d] / counts[slot] as f64;
                    }
                }
            }
        }

        Ok(self.build_clusters(wallets, &points, &centroids, &assignments, k))
    }

    fn resolve_k(&self, n: usize) -> Result<usize> {
        let k = match self.config.cluster_count {
            Some(0) => {
                return Err(ProfilerError::InvalidParameter(
                    "cluster count must be > 0".into(),
                ))
            }
            Some(k) => k,
            None => {
                let derived = ((n as f64 / 2.0).sqrt()).ceil() as usize;
                derived.clamp(1, self.config.max_clusters)
            }
        };
        if k > n {
            warn!(k, n, "requested more clusters than wallets; clamping to n");
            return Ok(n);
        }
        Ok(k)
    }

    fn build_clusters(
        &self,
        wallets: &[WalletFeatureVector],
        points: &[Vec<f64>],
        centroids: &[Vec<f64>],
        assignments: &[usize],
        k: usize,
    ) -> Vec<Cluster> {
        let mut clusters = Vec::new();
        for slot in 0..k {
            let member_indices: Vec<usize> = assignments
                .iter()
                .enumerate()
                .filter(|(_, &a)| a == slot)
                .map(|(i, _)| i)
                .collect();
            if member_indices.is_empty() {
                continue;
            }

            let mean_distance = member_indices
                .iter()
                .map(|&i| euclidean_distance(&points[i], &centroids[slot]))
                .sum::<f64>()
                / member_indices.len() as f64;
            let cohesion = (1.0 - mean_distance).max(0.0);

            let members: Vec<&WalletFeatureVector> =
                member_indices.iter().map(|&i| &wallets[i]).collect();
            let characteristics = aggregate_characteristics(&members, cohesion);

            clusters.push(Cluster {
                id: clusters.len(),
                members: members.iter().map(|w| w.address.clone()).collect(),
                centroid: centroids[slot].clone(),
                cohesion,
                characteristics,
            });
        }
        debug!(clusters = clusters.len(), "clustering finished");
        clusters
    }
}

/// K-means++ seeding: uniform first pick, then squared-distance-weighted
/// roulette for each subsequent centroid.
fn seed_centroids_plus_plus<R: Rng>(
    points: &[Vec<f64>],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| {
                        let d = euclidean_distance(p, c);
                        d * d
                    })
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let chosen = if total == 0.0 {
            // Every point coincides with a centroid; fall back to uniform.
            rng.gen_range(0..points.len())
        } else {
            let mut target = rng.gen::<f64>() * total;
            let mut index = points.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target <= *w {
                    index = i;
                    break;
                }
                target -= w;
            }
            index
        };
        centroids.push(points[chosen].clone());
    }
    centroids
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = euclidean_distance(point, centroid);
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

/// Aggregate member profiles into cluster-level characteristics.
fn aggregate_characteristics(
    members: &[&WalletFeatureVector],
    cohesion: f64,
) -> ClusterCharacteristics {
    let count = members.len() as f64;
    let mean_value =
        members.iter().map(|w| w.avg_transaction_value).sum::<f64>() / count;
    let mean_frequency =
        members.iter().map(|w| w.activity_frequency).sum::<f64>() / count;
    let mean_protocols =
        members.iter().map(|w| w.unique_protocols as f64).sum::<f64>() / count;
    let mean_age = members.iter().map(|w| w.account_age_days).sum::<f64>() / count;
    let mean_hour_breadth =
        members.iter().map(|w| w.preferred_hours.len() as f64).sum::<f64>() / count;

    let mut protocol_totals: std::collections::BTreeMap<&str, u64> =
        std::collections::BTreeMap::new();
    for member in members {
        for (protocol, interactions) in &member.protocol_interactions {
            *protocol_totals.entry(protocol.as_str()).or_insert(0) += interactions;
        }
    }
    let mut ranked: Vec<(&str, u64)> = protocol_totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let common_protocols: Vec<String> =
        ranked.into_iter().take(3).map(|(p, _)| p.to_string()).collect();

    let profile = classify_inputs(&BehaviorInputs {
        unique_protocols: mean_protocols,
        avg_transaction_value: mean_value,
        activity_frequency: mean_frequency,
        hour_breadth: mean_hour_breadth,
        account_age_days: mean_age,
    });

    // Coordination suspicion: additive evidence over aggregate stats, same
    // style as the sybil scorer, clamped to 100.
    let mut suspicion: f64 = 0.0;
    if cohesion > 0.9 && members.len() >= 3 {
        suspicion += 40.0;
    }
    if mean_frequency > 10.0 {
        suspicion += 30.0;
    }
    if mean_protocols > 10.0 {
        suspicion += 20.0;
    }
    if members.len() >= 5 {
        suspicion += 10.0;
    }

    ClusterCharacteristics {
        mean_transaction_value: mean_value,
        common_protocols,
        behavior_label: profile.pattern,
        suspicion_score: suspicion.min(100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn wallet(address: &str, avg_value: f64, frequency: f64) -> WalletFeatureVector {
        WalletFeatureVector {
            address: address.to_string(),
            transaction_count: 10,
            unique_protocols: 2,
            avg_transaction_value: avg_value,
            avg_gas_price: 20.0,
            first_activity: 0,
            last_activity: 0,
            account_age_days: 30.0,
            activity_frequency: frequency,
            total_gas_spent: 200.0,
            preferred_hours: vec![10],
            preferred_days: vec![1],
            protocol_interactions: BTreeMap::new(),
            token_interactions: BTreeMap::new(),
            counterparties: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        let clusterer = KMeansClusterer::new(ClusteringConfig::default());
        assert!(clusterer.cluster(&[]).unwrap().is_empty());
    }

    #[test]
    fn explicit_zero_k_is_rejected() {
        let config = ClusteringConfig { cluster_count: Some(0), ..Default::default() };
        let clusterer = KMeansClusterer::new(config);
        let err = clusterer.cluster(&[wallet("0xa", 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidParameter(_)));
    }

    #[test]
    fn output_is_a_partition() {
        let wallets: Vec<WalletFeatureVector> = (0..12)
            .map(|i| wallet(&format!("0x{i}"), (i as f64) * 10.0, i as f64))
            .collect();
        let clusterer = KMeansClusterer::new(ClusteringConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        let clusters = clusterer.cluster_with_rng(&wallets, &mut rng).unwrap();

        let mut seen: Vec<String> = clusters
            .iter()
            .flat_map(|c| c.members.iter().cloned())
            .collect();
        seen.sort();
        let mut expected: Vec<String> =
            wallets.iter().map(|w| w.address.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
        for cluster in &clusters {
            assert!(!cluster.members.is_empty());
            assert!((0.0..=1.0).contains(&cluster.cohesion));
        }
    }

    #[test]
    fn k_clamped_to_population() {
        let wallets = vec![wallet("0xa", 1.0, 1.0), wallet("0xb", 2.0, 2.0)];
        let config = ClusteringConfig { cluster_count: Some(10), ..Default::default() };
        let clusterer = KMeansClusterer::new(config);
        let mut rng = StdRng::seed_from_u64(1);
        let clusters = clusterer.cluster_with_rng(&wallets, &mut rng).unwrap();
        assert!(clusters.len() <= 2);
    }

    #[test]
    fn identical_points_collapse_to_one_cluster_without_panic() {
        let wallets = vec![wallet("0xa", 5.0, 1.0); 4];
        let config = ClusteringConfig { cluster_count: Some(2), ..Default::default() };
        let clusterer = KMeansClusterer::new(config);
        let mut rng = StdRng::seed_from_u64(3);
        let clusters = clusterer.cluster_with_rng(&wallets, &mut rng).unwrap();
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn derived_k_matches_formula() {
        let clusterer = KMeansClusterer::new(ClusteringConfig::default());
        // n = 8 -> ceil(sqrt(4)) = 2
        assert_eq!(clusterer.resolve_k(8).unwrap(), 2);
        // formula capped at max_clusters for huge n
        assert_eq!(clusterer.resolve_k(100_000).unwrap(), 50);
    }
}
