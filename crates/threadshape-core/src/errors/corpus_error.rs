//! Corpus store errors.

use super::error_code::{self, ThreadshapeErrorCode};

/// Errors raised by a corpus store while loading or resolving conversations.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Conversation not found: {id}")]
    ConversationNotFound { id: String },

    #[error("Corpus I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corpus parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Duplicate conversation id: {id}")]
    DuplicateConversation { id: String },
}

impl ThreadshapeErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConversationNotFound { .. } => error_code::RESOLUTION_FAILURE,
            _ => error_code::CORPUS_ERROR,
        }
    }
}
