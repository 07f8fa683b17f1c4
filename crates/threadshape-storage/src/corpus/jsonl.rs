//! JSON-lines corpus with precomputed per-horizon features.
//!
//! One conversation per line:
//!
//! ```json
//! {"id": "t1", "group": "askscience",
//!  "utterances": [{"id": "t1", "author": "a", "reply_to": null, "timestamp": 0}],
//!  "features": {"3": [{"name": "max_indegree", "value": 2.0}, {"name": "entropy", "value": null}]}}
//! ```
//!
//! A `null` feature value is a missing value.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use threadshape_core::errors::{CorpusError, TensorError};
use threadshape_core::traits::{CorpusStore, FeatureExtractor};
use threadshape_core::types::{Conversation, FeatureSnapshot, Utterance};

#[derive(Debug, Deserialize)]
struct ConversationLine {
    id: String,
    group: String,
    utterances: Vec<Utterance>,
    #[serde(default)]
    features: BTreeMap<usize, Vec<FeatureEntry>>,
}

#[derive(Debug, Deserialize)]
struct FeatureEntry {
    name: String,
    value: Option<f64>,
}

/// Corpus loaded from a JSONL file; enumeration order is file order.
#[derive(Debug, Default)]
pub struct JsonlCorpus {
    order: Vec<String>,
    conversations: FxHashMap<String, Conversation>,
    features: FxHashMap<String, BTreeMap<usize, FeatureSnapshot>>,
}

impl JsonlCorpus {
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let file = File::open(path).map_err(|e| CorpusError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let corpus = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            conversations = corpus.len(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CorpusError> {
        let mut corpus = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| CorpusError::Parse {
                line: line_no,
                message: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: ConversationLine =
                serde_json::from_str(&line).map_err(|e| CorpusError::Parse {
                    line: line_no,
                    message: e.to_string(),
                })?;
            corpus.insert(parsed)?;
        }
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, line: ConversationLine) -> Result<(), CorpusError> {
        if self.conversations.contains_key(&line.id) {
            return Err(CorpusError::DuplicateConversation { id: line.id });
        }
        let snapshots = line
            .features
            .into_iter()
            .map(|(horizon, entries)| {
                let snapshot = entries
                    .into_iter()
                    .map(|e| (e.name, e.value.unwrap_or(f64::NAN)))
                    .collect::<FeatureSnapshot>();
                (horizon, snapshot)
            })
            .collect();
        self.order.push(line.id.clone());
        self.features.insert(line.id.clone(), snapshots);
        self.conversations.insert(
            line.id.clone(),
            Conversation {
                id: line.id,
                group: line.group,
                utterances: line.utterances,
            },
        );
        Ok(())
    }
}

impl CorpusStore for JsonlCorpus {
    fn conversation_ids(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self.order.clone())
    }

    fn conversation(&self, id: &str) -> Result<Conversation, CorpusError> {
        self.conversations
            .get(id)
            .cloned()
            .ok_or_else(|| CorpusError::ConversationNotFound { id: id.to_string() })
    }
}

impl FeatureExtractor for JsonlCorpus {
    fn extract(&self, conversation: &Conversation, horizon: usize) -> Result<FeatureSnapshot, TensorError> {
        self.features
            .get(&conversation.id)
            .and_then(|by_horizon| by_horizon.get(&horizon))
            .cloned()
            .ok_or_else(|| TensorError::ExtractionFailed {
                conversation_id: conversation.id.clone(),
                horizon,
                message: "no precomputed features for this horizon".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"{"id":"t1","group":"a","utterances":[{"id":"t1","author":"x","reply_to":null,"timestamp":0},{"id":"u2","author":"y","reply_to":"t1","timestamp":5}],"features":{"3":[{"name":"f0","value":1.0},{"name":"f1","value":null}]}}

{"id":"t2","group":"b","utterances":[{"id":"t2","author":"z","timestamp":1}],"features":{"3":[{"name":"f0","value":2.0},{"name":"f1","value":3.0}]}}
"#;

    #[test]
    fn loads_in_file_order_and_skips_blank_lines() {
        let corpus = JsonlCorpus::from_reader(CORPUS.as_bytes()).unwrap();
        assert_eq!(corpus.conversation_ids().unwrap(), vec!["t1", "t2"]);
        let t1 = corpus.conversation("t1").unwrap();
        assert_eq!(t1.group, "a");
        assert_eq!(t1.utterances[1].reply_to.as_deref(), Some("t1"));
        assert_eq!(corpus.conversation("t2").unwrap().utterances[0].reply_to, None);
    }

    #[test]
    fn null_features_become_nan() {
        let corpus = JsonlCorpus::from_reader(CORPUS.as_bytes()).unwrap();
        let t1 = corpus.conversation("t1").unwrap();
        let snap = corpus.extract(&t1, 3).unwrap();
        assert_eq!(snap.names().collect::<Vec<_>>(), vec!["f0", "f1"]);
        assert_eq!(snap.get("f0"), Some(1.0));
        assert!(snap.get("f1").unwrap().is_nan());
    }

    #[test]
    fn missing_horizon_is_an_extraction_failure() {
        let corpus = JsonlCorpus::from_reader(CORPUS.as_bytes()).unwrap();
        let t1 = corpus.conversation("t1").unwrap();
        assert!(matches!(
            corpus.extract(&t1, 4),
            Err(TensorError::ExtractionFailed { horizon: 4, .. })
        ));
    }

    #[test]
    fn unknown_conversation_is_not_found() {
        let corpus = JsonlCorpus::from_reader(CORPUS.as_bytes()).unwrap();
        assert!(matches!(
            corpus.conversation("nope"),
            Err(CorpusError::ConversationNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = format!("{}\n{}", CORPUS.lines().next().unwrap(), CORPUS.lines().next().unwrap());
        assert!(matches!(
            JsonlCorpus::from_reader(text.as_bytes()),
            Err(CorpusError::DuplicateConversation { .. })
        ));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = "{\"id\":\"t1\"}\n";
        match JsonlCorpus::from_reader(text.as_bytes()) {
            Err(CorpusError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
