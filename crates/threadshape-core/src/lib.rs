//! threadshape-core: shared foundation for the threadshape tensor pipeline.
//!
//! - Types: dense conversation tensor, CP factor matrices, conversation records
//! - Traits: feature extractor, decomposition solver, corpus store, artifact store
//! - Errors: one `thiserror` enum per subsystem plus the pipeline aggregate
//! - Config: layered TOML configuration passed explicitly into every stage
//! - Tracing: `tracing-subscriber` setup driven by `THREADSHAPE_LOG`

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::ThreadshapeConfig;
pub use errors::{PipelineError, StageError};
pub use types::{ArtifactKey, CpFactors, FactorMatrix, RankToFactors, Tensor3};
