//! Seams to the external collaborators of the pipeline.
//!
//! The core never implements feature extraction, CP optimization, or corpus
//! loading itself; it talks to them through these traits.

pub mod artifact_store;
pub mod corpus_store;
pub mod feature_extractor;
pub mod solver;

pub use artifact_store::{ArtifactStore, ArtifactStoreExt};
pub use corpus_store::CorpusStore;
pub use feature_extractor::FeatureExtractor;
pub use solver::{CpSolver, SolverOptions};
