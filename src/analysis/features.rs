//! Wallet feature extraction.
//!
//! Turns a wallet's raw transaction list into the fixed-shape behavioral
//! profile every downstream component consumes. Deterministic and
//! side-effect free; the reference clock is injectable for tests.

use chrono::{DateTime, Datelike, Timelike, Utc};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::config::FeatureConfig;
use crate::core::errors::{ProfilerError, Result};
use crate::core::types::{TransactionRecord, WalletFeatureVector};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Stateless extractor; holds only the top-k bucket configuration.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Extract a profile using the current wall clock as the age reference.
    pub fn extract(
        &self,
        address: &str,
        transactions: &[TransactionRecord],
    ) -> Result<WalletFeatureVector> {
        self.extract_at(address, transactions, Utc::now().timestamp())
    }

    /// Extract a profile with an explicit "now" timestamp.
    pub fn extract_at(
        &self,
        address: &str,
        transactions: &[TransactionRecord],
        now: i64,
    ) -> Result<WalletFeatureVector> {
        if transactions.is_empty() {
            return Err(ProfilerError::InsufficientData { address: address.to_string() });
        }

        let count = transactions.len() as u64;
        let total_value: f64 = transactions.iter().map(|tx| tx.value).sum();
        let total_gas: f64 = transactions.iter().map(|tx| tx.gas_price).sum();
        let avg_value = total_value / count as f64;
        let avg_gas = total_gas / count as f64;

        let first_activity =
            transactions.iter().map(|tx| tx.timestamp).min().unwrap_or(now);
        let last_activity =
            transactions.iter().map(|tx| tx.timestamp).max().unwrap_or(now);

        // Age floored at one day so frequency never divides by zero.
        let age_days = ((now - first_activity) as f64 / SECONDS_PER_DAY).max(1.0);
        let frequency = count as f64 / age_days;

        let preferred_hours = top_k_buckets(
            transactions.iter().map(|tx| hour_of(tx.timestamp)),
            self.config.preferred_hours,
        );
        let preferred_days = top_k_buckets(
            transactions.iter().map(|tx| weekday_of(tx.timestamp)),
            self.config.preferred_days,
        );

        let mut protocol_interactions: BTreeMap<String, u64> = BTreeMap::new();
        let mut token_interactions: BTreeMap<String, u64> = BTreeMap::new();
        let mut counterparties: BTreeMap<String, u64> = BTreeMap::new();

        for tx in transactions {
            if let Some(protocol) = &tx.protocol {
                *protocol_interactions.entry(protocol.clone()).or_insert(0) += 1;
            }
            if let Some(token) = &tx.token {
                *token_interactions.entry(token.clone()).or_insert(0) += 1;
            }
            if let Some(other) = counterparty_of(address, tx) {
                *counterparties.entry(other.to_string()).or_insert(0) += 1;
            }
        }

        Ok(WalletFeatureVector {
            address: address.to_string(),
            transaction_count: count,
            unique_protocols: protocol_interactions.len() as u64,
            avg_transaction_value: avg_value,
            avg_gas_price: avg_gas,
            first_activity,
            last_activity,
            account_age_days: age_days,
            activity_frequency: frequency,
            total_gas_spent: total_gas,
            preferred_hours,
            preferred_days,
            protocol_interactions,
            token_interactions,
            counterparties,
        })
    }
}

/// The "other side" of a transaction relative to the profiled wallet.
/// Self-transfers have no counterparty.
fn counterparty_of<'a>(address: &str, tx: &'a TransactionRecord) -> Option<&'a str> {
    let is_sender = tx.from.eq_ignore_ascii_case(address);
    let is_recipient = tx.to.eq_ignore_ascii_case(address);
    match (is_sender, is_recipient) {
        (true, true) => None,
        (true, false) => Some(tx.to.as_str()),
        _ => Some(tx.from.as_str()),
    }
}

fn hour_of(timestamp: i64) -> u32 {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .hour()
}

fn weekday_of(timestamp: i64) -> u32 {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .weekday()
        .num_days_from_monday()
}

/// Top-k mode over calendar buckets. Ties break by first-seen order, so the
/// result is stable for a given transaction ordering.
fn top_k_buckets(values: impl Iterator<Item = u32>, k: usize) -> Vec<u32> {
    let mut counts: HashMap<u32, (u64, usize)> = HashMap::new();
    for (index, value) in values.enumerate() {
        let entry = counts.entry(value).or_insert((0, index));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .map(|(v, (c, first))| (v, c, first))
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)))
        .take(k)
        .map(|(v, _, _)| v)
        .collect()
}
