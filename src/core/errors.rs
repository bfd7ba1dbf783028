//! Error types for the profiling engine.
//!
//! A single error enum covers every failure mode of the core: bad caller
//! input and config/serialization problems at the boundaries. The core does
//! no I/O, so there are no transient-failure variants.

use thiserror::Error;

/// Errors produced by the wallet profiling engine.
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// A wallet has no transactions, so no averages can be computed.
    /// Fatal for that wallet only; batch operations skip and report it.
    #[error("insufficient data for {address}: empty transaction list")]
    InsufficientData { address: String },

    /// Caller asked for something impossible (e.g. k = 0 clusters).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// JSON/TOML (de)serialization at the CLI boundary.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ProfilerError {
    fn from(e: serde_json::Error) -> Self {
        ProfilerError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for ProfilerError {
    fn from(e: toml::de::Error) -> Self {
        ProfilerError::Configuration(e.to_string())
    }
}

impl From<toml::ser::Error> for ProfilerError {
    fn from(e: toml::ser::Error) -> Self {
        ProfilerError::Configuration(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProfilerError>;
