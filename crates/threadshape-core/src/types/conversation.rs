//! Typed conversation records handed out by a corpus store.

use serde::{Deserialize, Serialize};

/// One utterance in a threaded conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: String,
    pub author: String,
    /// The utterance this one replies to; `None` for the thread root.
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Chronological position; only the relative order matters.
    pub timestamp: i64,
}

/// A conversation with only the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Group label, e.g. the community the thread originated in.
    pub group: String,
    pub utterances: Vec<Utterance>,
}

impl Conversation {
    /// 0-based chronological position of each utterance, indexed like
    /// `utterances`. Ties on timestamp keep corpus order.
    pub fn chronological_positions(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.utterances.len()).collect();
        order.sort_by_key(|&i| self.utterances[i].timestamp);
        let mut positions = vec![0; self.utterances.len()];
        for (position, idx) in order.into_iter().enumerate() {
            positions[idx] = position;
        }
        positions
    }
}
