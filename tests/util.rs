// tests/util.rs
// Shared builders for integration tests

use defi_wallet_profiler::{TransactionRecord, WalletFeatureVector};
use std::collections::BTreeMap;

pub const NOW: i64 = 1_700_000_000;

/// Midnight-aligned base timestamp `days` days before NOW.
#[allow(dead_code)]
pub fn day_base(days: i64) -> i64 {
    let t = NOW - days * 86_400;
    t - t.rem_euclid(86_400)
}

#[allow(dead_code)]
pub fn tx(timestamp: i64, value: f64, gas_price: f64, from: &str, to: &str) -> TransactionRecord {
    TransactionRecord {
        timestamp,
        value,
        gas_price,
        from: from.to_string(),
        to: to.to_string(),
        protocol: None,
        token: None,
    }
}

/// A synthetic profile with the fields downstream components care about.
#[allow(dead_code, clippy::too_many_arguments)]
pub fn feature_vector(
    address: &str,
    tx_count: u64,
    unique_protocols: u64,
    avg_value: f64,
    avg_gas: f64,
    frequency: f64,
    age_days: f64,
    hours: &[u32],
    counterparties: &[(&str, u64)],
) -> WalletFeatureVector {
    WalletFeatureVector {
        address: address.to_string(),
        transaction_count: tx_count,
        unique_protocols,
        avg_transaction_value: avg_value,
        avg_gas_price: avg_gas,
        first_activity: NOW - (age_days * 86_400.0) as i64,
        last_activity: NOW,
        account_age_days: age_days,
        activity_frequency: frequency,
        total_gas_spent: avg_gas * tx_count as f64,
        preferred_hours: hours.to_vec(),
        preferred_days: vec![1, 3],
        protocol_interactions: BTreeMap::new(),
        token_interactions: BTreeMap::new(),
        counterparties: counterparties
            .iter()
            .map(|(a, c)| (a.to_string(), *c))
            .collect(),
    }
}
