//! Sybil detection over pairwise wallet similarity.
//!
//! Compares one target wallet against a population using cosine similarity on
//! raw feature tuples, then corroborates each high-similarity pair with
//! temporal, counterparty, and funding signals. Every triggered signal adds
//! to a running suspicion score and leaves an evidence string.

use std::collections::HashSet;
use tracing::debug;

use crate::analysis::similarity::cosine_similarity;
use crate::config::SybilConfig;
use crate::core::types::{AttackPattern, RelatedWallet, SybilAnalysis, WalletFeatureVector};

pub struct SybilDetector {
    config: SybilConfig,
}

impl SybilDetector {
    pub fn new(config: SybilConfig) -> Self {
        Self { config }
    }

    /// Analyze `target` against the rest of the population. The target itself
    /// is excluded from comparison by address.
    pub fn analyze(
        &self,
        target: &WalletFeatureVector,
        population: &[WalletFeatureVector],
    ) -> SybilAnalysis {
        let target_tuple = target.to_numeric_tuple();
        let target_hours: HashSet<u32> = target.preferred_hours.iter().copied().collect();
        let target_counterparties: HashSet<&str> = target.counterparty_set().collect();

        let mut suspicion: f64 = 0.0;
        let mut related: Vec<RelatedWallet> = Vec::new();
        let mut evidence: Vec<String> = Vec::new();

        for other in population {
            if other.address.eq_ignore_ascii_case(&target.address) {
                continue;
            }

            let similarity = cosine_similarity(&target_tuple, &other.to_numeric_tuple());
            if similarity <= self.config.similarity_threshold {
                continue;
            }

            related.push(RelatedWallet { address: other.address.clone(), similarity });
            suspicion += 20.0;

            let shared_hours = other
                .preferred_hours
                .iter()
                .filter(|h| target_hours.contains(h))
                .count();
            if shared_hours >= self.config.shared_hours_min {
                suspicion += 10.0;
                evidence.push(format!(
                    "{}: {} shared preferred hours (temporal correlation)",
                    other.address, shared_hours
                ));
            }

            let shared_counterparties = other
                .counterparty_set()
                .filter(|c| target_counterparties.contains(c))
                .count();
            if shared_counterparties >= self.config.shared_counterparties_min {
                suspicion += 15.0;
                evidence.push(format!(
                    "{}: {} common counterparties",
                    other.address, shared_counterparties
                ));
            }

            if funding_is_similar(
                target.avg_transaction_value,
                other.avg_transaction_value,
                self.config.funding_delta_pct,
            ) {
                suspicion += 20.0;
                evidence.push(format!(
                    "{}: average transaction values within {:.0}%",
                    other.address,
                    self.config.funding_delta_pct * 100.0
                ));
            }
        }

        // Highest similarity first; stable so equal scores keep input order.
        related.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        related.truncate(self.config.max_related_wallets);

        let is_sybil = suspicion > self.config.sybil_score_threshold;
        let confidence = suspicion.min(100.0);
        let pattern = self.classify_pattern(target, suspicion, related.len());

        debug!(
            address = %target.address,
            suspicion,
            related = related.len(),
            ?pattern,
            "sybil analysis complete"
        );

        SybilAnalysis {
            address: target.address.clone(),
            is_sybil,
            confidence,
            related_wallets: related,
            evidence,
            risk_score: suspicion,
            pattern,
        }
    }

    /// Attack pattern is only assigned once suspicion is well past the sybil
    /// threshold; below that everything reads as legitimate.
    fn classify_pattern(
        &self,
        target: &WalletFeatureVector,
        suspicion: f64,
        related_count: usize,
    ) -> AttackPattern {
        if suspicion <= self.config.pattern_score_threshold {
            return AttackPattern::Legitimate;
        }
        if target.unique_protocols > 10 && related_count > 5 {
            AttackPattern::AirdropFarming
        } else if target.activity_frequency > 10.0 {
            AttackPattern::BotNetwork
        } else {
            AttackPattern::WashTrading
        }
    }
}

fn funding_is_similar(a: f64, b: f64, delta_pct: f64) -> bool {
    let reference = a.abs().max(b.abs());
    if reference == 0.0 {
        // Both averages are zero: identical funding.
        return true;
    }
    (a - b).abs() / reference < delta_pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn wallet(address: &str, avg_value: f64, hours: &[u32]) -> WalletFeatureVector {
        WalletFeatureVector {
            address: address.to_string(),
            transaction_count: 20,
            unique_protocols: 3,
            avg_transaction_value: avg_value,
            avg_gas_price: 20.0,
            first_activity: 0,
            last_activity: 0,
            account_age_days: 30.0,
            activity_frequency: 0.7,
            total_gas_spent: 400.0,
            preferred_hours: hours.to_vec(),
            preferred_days: vec![1, 3],
            protocol_interactions: BTreeMap::new(),
            token_interactions: BTreeMap::new(),
            counterparties: BTreeMap::new(),
        }
    }

    fn with_counterparties(
        mut w: WalletFeatureVector,
        addrs: &[&str],
    ) -> WalletFeatureVector {
        w.counterparties = addrs.iter().map(|a| (a.to_string(), 2u64)).collect();
        w
    }

    #[test]
    fn twin_wallet_is_flagged() {
        let detector = SybilDetector::new(SybilConfig::default());
        let shared = ["0xc1", "0xc2", "0xc3", "0xc4", "0xc5"];
        let target = with_counterparties(wallet("0xa", 100.0, &[10, 11]), &shared);
        let twin = with_counterparties(wallet("0xb", 100.0, &[10, 11]), &shared);

        let report = detector.analyze(&target, &[twin]);
        // 20 (similarity) + 10 (hours) + 15 (counterparties) + 20 (funding)
        assert_eq!(report.risk_score, 65.0);
        assert!(report.is_sybil);
        assert_eq!(report.confidence, 65.0);
        assert_eq!(report.related_wallets.len(), 1);
        assert_eq!(report.related_wallets[0].address, "0xb");
        assert_eq!(report.evidence.len(), 3);
    }

    #[test]
    fn dissimilar_wallet_is_ignored() {
        let detector = SybilDetector::new(SybilConfig::default());
        let target = wallet("0xa", 100.0, &[10, 11]);
        let mut whale = wallet("0xw", 100_000.0, &[3]);
        whale.transaction_count = 1;
        whale.activity_frequency = 0.001;
        whale.account_age_days = 2000.0;
        whale.total_gas_spent = 5.0;

        let report = detector.analyze(&target, &[whale]);
        assert!(!report.is_sybil);
        assert!(report.related_wallets.is_empty());
        assert_eq!(report.pattern, AttackPattern::Legitimate);
    }

    #[test]
    fn self_comparison_excluded() {
        let detector = SybilDetector::new(SybilConfig::default());
        let target = wallet("0xa", 100.0, &[10]);
        let report = detector.analyze(&target, std::slice::from_ref(&target));
        assert_eq!(report.risk_score, 0.0);
        assert!(report.related_wallets.is_empty());
    }

    #[test]
    fn related_list_capped_at_ten() {
        let detector = SybilDetector::new(SybilConfig::default());
        let target = wallet("0xa", 100.0, &[10, 11]);
        let population: Vec<WalletFeatureVector> =
            (0..15).map(|i| wallet(&format!("0x{i:02}"), 100.0, &[10, 11])).collect();
        let report = detector.analyze(&target, &population);
        assert_eq!(report.related_wallets.len(), 10);
        assert!(report.is_sybil);
        assert!(report.confidence <= 100.0);
        assert!(report.risk_score > 100.0);
    }

    #[test]
    fn bot_network_pattern_on_high_frequency() {
        let detector = SybilDetector::new(SybilConfig::default());
        let mut target = wallet("0xa", 100.0, &[10, 11]);
        target.activity_frequency = 12.0;
        let population: Vec<WalletFeatureVector> = (0..3)
            .map(|i| {
                let mut w = wallet(&format!("0x{i:02}"), 100.0, &[10, 11]);
                w.activity_frequency = 12.0;
                w
            })
            .collect();
        let report = detector.analyze(&target, &population);
        assert!(report.risk_score > 80.0);
        assert_eq!(report.pattern, AttackPattern::BotNetwork);
    }

    #[test]
    fn funding_similarity_boundary() {
        assert!(funding_is_similar(100.0, 109.0, 0.10));
        assert!(!funding_is_similar(100.0, 111.0, 0.10));
        assert!(funding_is_similar(0.0, 0.0, 0.10));
    }
}
