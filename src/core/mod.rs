pub mod errors;
pub mod types;

pub use errors::{ProfilerError, Result};
pub use types::{
    AttackPattern, BehaviorPattern, BehaviorProfile, Cluster, ClusterCharacteristics, Community,
    GraphEdge, GraphNode, NetworkGraph, RelatedWallet, SybilAnalysis, TransactionRecord,
    WalletFeatureVector,
};
