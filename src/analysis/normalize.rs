//! Batch min-max normalization of feature tuples.
//!
//! Rescales every dimension to [0, 1] relative to the batch, so no single
//! dimension (e.g. raw transaction counts vs. fractional frequencies)
//! dominates Euclidean distances during clustering. Output is batch-relative:
//! the same wallet normalizes differently against different populations.

use crate::core::types::WalletFeatureVector;

/// Min-max scale a batch of profiles into [0, 1] per dimension.
///
/// A dimension with zero range across the batch maps to 0 for every vector.
pub fn normalize_batch(vectors: &[WalletFeatureVector]) -> Vec<Vec<f64>> {
    if vectors.is_empty() {
        return Vec::new();
    }

    let tuples: Vec<[f64; WalletFeatureVector::DIMENSION]> =
        vectors.iter().map(WalletFeatureVector::to_numeric_tuple).collect();

    let mut mins = [f64::INFINITY; WalletFeatureVector::DIMENSION];
    let mut maxs = [f64::NEG_INFINITY; WalletFeatureVector::DIMENSION];
    for tuple in &tuples {
        for (d, &value) in tuple.iter().enumerate() {
            mins[d] = mins[d].min(value);
            maxs[d] = maxs[d].max(value);
        }
    }

    tuples
        .iter()
        .map(|tuple| {
            tuple
                .iter()
                .enumerate()
                .map(|(d, &value)| {
                    let range = maxs[d] - mins[d];
                    if range == 0.0 {
                        0.0
                    } else {
                        (value - mins[d]) / range
                    }
                })
                .collect()
        })
        .collect()
}
