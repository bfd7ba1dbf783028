// src/lib.rs

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod service;

pub use crate::config::ProfilerConfig;
pub use crate::core::errors::{ProfilerError, Result};
pub use crate::core::types::{
    AttackPattern, BehaviorPattern, BehaviorProfile, Cluster, Community, GraphEdge, GraphNode,
    NetworkGraph, RelatedWallet, SybilAnalysis, TransactionRecord, WalletFeatureVector,
};
pub use crate::service::{AnalysisReport, PopulationProfile, TransactionBatch, WalletProfiler};
