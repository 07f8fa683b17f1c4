//! Error handling for threadshape.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod corpus_error;
pub mod detection_error;
pub mod error_code;
pub mod pipeline_error;
pub mod report_error;
pub mod solver_error;
pub mod storage_error;
pub mod tensor_error;

pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use detection_error::DetectionError;
pub use error_code::ThreadshapeErrorCode;
pub use pipeline_error::{PipelineError, PipelineResult, PipelineStage, StageError};
pub use report_error::ReportError;
pub use solver_error::SolverError;
pub use storage_error::StorageError;
pub use tensor_error::TensorError;
