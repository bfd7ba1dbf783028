//! Analysis components: feature extraction, normalization, similarity,
//! clustering, sybil detection, graph building, and behavior classification.
//!
//! Every component is pure and stateless given its inputs; concurrent
//! invocations need no locking as long as each call owns its data.

pub mod classifier;
pub mod clustering;
pub mod features;
pub mod graph;
pub mod normalize;
pub mod similarity;
pub mod sybil;

pub use classifier::{classify, classify_inputs, BehaviorInputs};
pub use clustering::KMeansClusterer;
pub use features::FeatureExtractor;
pub use graph::NetworkGraphBuilder;
pub use normalize::normalize_batch;
pub use similarity::{cosine_similarity, euclidean_distance};
pub use sybil::SybilDetector;
