//! Shared fixtures for threadshape tests: in-memory corpora, tensor-backed
//! extractors, synthetic tensors and reference solvers.
//!
//! Everything here panics freely on misuse; it is test-only code.

pub mod corpus;
pub mod extractor;
pub mod solver;
pub mod tensors;

pub use corpus::{conversation, grouped_corpus, MemoryCorpus};
pub use extractor::{FnExtractor, TensorExtractor};
pub use solver::{CountingSolver, FailingSolver, MalformedSolver, PowerIterationSolver};
pub use tensors::{corpus_jsonl, feature_names, spike_tensor, two_spike_tensor};
