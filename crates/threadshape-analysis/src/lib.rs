//! threadshape-analysis: the tensor pipeline proper.
//!
//! Feature tensor assembly, CP decomposition orchestration, z-score anomaly
//! detection on factor columns, group-normalized ranking, and detailed
//! per-conversation examples, wired together as resumable pipeline stages.

pub mod anomaly;
pub mod decomposition;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod tensor;

pub use anomaly::{AnomalyDetector, ComponentAnomalies, Polarity};
pub use decomposition::{CommandSolver, DecompositionOrchestrator, DecompositionOutcome};
pub use pipeline::{Pipeline, RunReport};
pub use ranking::{GroupedRankingSummarizer, RankingEntry, Summary};
pub use report::{DetailedExampleReporter, ExampleReport};
pub use tensor::{FeatureMatrixBuilder, TensorBuild};
