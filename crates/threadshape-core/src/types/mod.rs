//! Core data model: tensor, factors, conversations, feature snapshots, artifact keys.

pub mod artifact;
pub mod collections;
pub mod conversation;
pub mod factors;
pub mod feature;
pub mod tensor;

pub use artifact::ArtifactKey;
pub use conversation::{Conversation, Utterance};
pub use factors::{CpFactors, FactorMatrix, RankToFactors, TensorMode};
pub use feature::FeatureSnapshot;
pub use tensor::Tensor3;
