//! ThreadshapeErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable code
/// alongside its human-readable message.
pub trait ThreadshapeErrorCode {
    /// Returns the error code string (e.g., "ARTIFACT_NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn display_with_code(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
pub const TENSOR_ERROR: &str = "TENSOR_ERROR";
pub const EXTRACTION_FAILED: &str = "EXTRACTION_FAILED";
pub const ARTIFACT_NOT_FOUND: &str = "ARTIFACT_NOT_FOUND";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const SOLVER_FAILURE: &str = "SOLVER_FAILURE";
pub const DEGENERATE_COLUMN: &str = "DEGENERATE_COLUMN";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const RESOLUTION_FAILURE: &str = "RESOLUTION_FAILURE";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
