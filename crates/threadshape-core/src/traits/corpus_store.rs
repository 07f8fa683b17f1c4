//! CorpusStore trait.

use crate::errors::CorpusError;
use crate::types::Conversation;

/// Read access to a static snapshot of conversations.
pub trait CorpusStore {
    /// Conversation ids in the corpus's fixed enumeration order. Every stage
    /// indexes conversations by position in this list.
    fn conversation_ids(&self) -> Result<Vec<String>, CorpusError>;

    /// Resolve one conversation by id.
    fn conversation(&self, id: &str) -> Result<Conversation, CorpusError>;
}
