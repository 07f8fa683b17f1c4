//! In-memory corpus store.

use rustc_hash::FxHashSet;
use threadshape_core::errors::CorpusError;
use threadshape_core::traits::CorpusStore;
use threadshape_core::types::{Conversation, Utterance};

/// Conversations held in enumeration order. Hidden ids are still enumerated
/// but fail to resolve, which simulates a corpus that changed under the
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    conversations: Vec<Conversation>,
    hidden: FxHashSet<String>,
}

impl MemoryCorpus {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            hidden: FxHashSet::default(),
        }
    }

    pub fn hide(&mut self, id: &str) {
        self.hidden.insert(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

impl CorpusStore for MemoryCorpus {
    fn conversation_ids(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self.conversations.iter().map(|c| c.id.clone()).collect())
    }

    fn conversation(&self, id: &str) -> Result<Conversation, CorpusError> {
        if self.hidden.contains(id) {
            return Err(CorpusError::ConversationNotFound { id: id.to_string() });
        }
        self.conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CorpusError::ConversationNotFound { id: id.to_string() })
    }
}

/// A conversation of `turns` utterances: a root followed by replies that
/// alternate between two authors, each replying to the previous turn.
pub fn conversation(id: &str, group: &str, turns: usize) -> Conversation {
    let utterances = (0..turns)
        .map(|t| Utterance {
            id: format!("{id}-u{t}"),
            author: format!("user{}", t % 2),
            reply_to: (t > 0).then(|| format!("{id}-u{}", t - 1)),
            timestamp: t as i64 * 60,
        })
        .collect();
    Conversation {
        id: id.to_string(),
        group: group.to_string(),
        utterances,
    }
}

/// One three-turn conversation per label, ids `c0`, `c1`, ...
pub fn grouped_corpus(groups: &[&str]) -> MemoryCorpus {
    MemoryCorpus::new(
        groups
            .iter()
            .enumerate()
            .map(|(i, group)| conversation(&format!("c{i}"), group, 3))
            .collect(),
    )
}
