//! CLI error type and exit codes.

use threadshape_core::errors::{
    error_code, ConfigError, CorpusError, SolverError, StageError, StorageError, ThreadshapeErrorCode,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Stage(#[from] StageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("`{command}` needs a corpus; pass --corpus <FILE>")]
    MissingCorpus { command: &'static str },

    #[error("Writing output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Encoding output failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for problems with the invocation itself, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::MissingCorpus { .. } => 2,
            Self::Solver(SolverError::NotConfigured { .. }) => 2,
            _ => 1,
        }
    }
}

impl ThreadshapeErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Stage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Solver(e) => e.error_code(),
            Self::MissingCorpus { .. } => error_code::CONFIG_ERROR,
            Self::Output(_) | Self::Encode(_) => error_code::PIPELINE_ERROR,
        }
    }
}
