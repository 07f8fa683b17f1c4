//! Corpus adapters implementing `CorpusStore` and `FeatureExtractor`.

pub mod jsonl;

pub use jsonl::JsonlCorpus;
