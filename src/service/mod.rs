pub mod profiler;

// Re-export so callers can use `crate::service::WalletProfiler`
pub use profiler::{
    AnalysisReport, PopulationProfile, SkippedWallet, TransactionBatch, WalletProfiler,
};
