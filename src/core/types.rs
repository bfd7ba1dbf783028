//! Data model for the wallet profiling engine.
//!
//! Everything here is plain structured data: computed fresh per invocation,
//! never mutated after construction, and serializable to JSON for a consuming
//! web layer. Public mappings use `BTreeMap` so serialized output is
//! deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw on-chain transaction, as supplied by the caller's data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unix timestamp (seconds).
    pub timestamp: i64,
    /// Transferred value in native token units.
    pub value: f64,
    /// Gas price paid (Gwei or chain-native unit; only relative scale matters).
    pub gas_price: f64,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Protocol the transaction interacted with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Token symbol involved, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// One wallet's behavioral profile over the analysis window.
///
/// Invariant: `transaction_count > 0` — extraction fails on an empty
/// transaction list rather than producing a degenerate profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletFeatureVector {
    pub address: String,
    pub transaction_count: u64,
    pub unique_protocols: u64,
    pub avg_transaction_value: f64,
    pub avg_gas_price: f64,
    /// Unix timestamp of the earliest observed transaction.
    pub first_activity: i64,
    /// Unix timestamp of the latest observed transaction.
    pub last_activity: i64,
    /// Account age in days, floored at 1.
    pub account_age_days: f64,
    /// Transactions per day of account age.
    pub activity_frequency: f64,
    /// Cumulative gas spent across the window.
    pub total_gas_spent: f64,
    /// Up to 3 most frequent hours-of-day (0-23), most frequent first.
    pub preferred_hours: Vec<u32>,
    /// Up to 2 most frequent days-of-week (0 = Monday), most frequent first.
    pub preferred_days: Vec<u32>,
    /// Protocol name -> interaction count.
    pub protocol_interactions: BTreeMap<String, u64>,
    /// Token symbol -> interaction count.
    pub token_interactions: BTreeMap<String, u64>,
    /// Counterparty address -> interaction count. The key set is the wallet's
    /// counterparty set; the counts feed the graph edge threshold.
    pub counterparties: BTreeMap<String, u64>,
}

impl WalletFeatureVector {
    /// Dimension of the numeric tuple used for normalization and similarity.
    pub const DIMENSION: usize = 9;

    /// Project the profile onto the fixed-order numeric tuple shared by the
    /// normalizer, the clusterer, and the similarity engine.
    pub fn to_numeric_tuple(&self) -> [f64; Self::DIMENSION] {
        [
            self.transaction_count as f64,
            self.unique_protocols as f64,
            self.avg_transaction_value,
            self.avg_gas_price,
            self.activity_frequency,
            self.total_gas_spent,
            self.account_age_days,
            self.preferred_hours.len() as f64,
            self.preferred_days.len() as f64,
        ]
    }

    /// Counterparty addresses as an iterator over the key set.
    pub fn counterparty_set(&self) -> impl Iterator<Item = &str> {
        self.counterparties.keys().map(String::as_str)
    }
}

/// One behavioral cluster produced by a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    /// Member wallet addresses; never empty in output.
    pub members: Vec<String>,
    /// Centroid in the same normalized space as the members.
    pub centroid: Vec<f64>,
    /// How tightly members pack around the centroid, in [0, 1].
    pub cohesion: f64,
    pub characteristics: ClusterCharacteristics,
}

/// Aggregated characteristics of a cluster's members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterCharacteristics {
    pub mean_transaction_value: f64,
    /// Most common protocols across members, most frequent first.
    pub common_protocols: Vec<String>,
    /// Qualitative label from the behavior classifier applied to the
    /// cluster's aggregate statistics.
    pub behavior_label: BehaviorPattern,
    /// Coordination suspicion score in [0, 100].
    pub suspicion_score: f64,
}

/// Closed set of coordinated-attack patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPattern {
    AirdropFarming,
    MoneyLaundering,
    WashTrading,
    BotNetwork,
    Legitimate,
}

/// A wallet flagged as related to a sybil target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedWallet {
    pub address: String,
    /// Cosine similarity against the target, in (0.85, 1].
    pub similarity: f64,
}

/// Per-target sybil report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SybilAnalysis {
    pub address: String,
    pub is_sybil: bool,
    /// Suspicion score clamped to [0, 100].
    pub confidence: f64,
    /// Top related wallets by similarity, capped at 10.
    pub related_wallets: Vec<RelatedWallet>,
    /// Human-readable evidence trail.
    pub evidence: Vec<String>,
    /// Raw accumulated suspicion score, unclamped.
    pub risk_score: f64,
    pub pattern: AttackPattern,
}

/// A node in the interaction graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub address: String,
    /// `ln(tx_count + 1) * ln(|counterparties| + 1)`.
    pub importance: f64,
}

/// A directed weighted edge between two wallets.
///
/// Invariant: only exists when `interactions` meets the configured minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub interactions: u64,
    /// Value proxy: interactions x the source wallet's average value.
    pub total_value: f64,
}

/// A connected community of at least two wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub members: Vec<String>,
    /// Fraction of possible intra-community pairs with an edge, in [0, 1].
    pub density: f64,
}

/// The full interaction graph for a population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub communities: Vec<Community>,
}

/// Behavior labels assigned by the rule-based classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorPattern {
    Farmer,
    Trader,
    Bot,
    Whale,
    Holder,
    NewUser,
}

/// Single-wallet classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub pattern: BehaviorPattern,
    /// Fixed per-rule confidence in [0, 100].
    pub confidence: f64,
    pub characteristics: Vec<String>,
}
