//! DetailedExampleReporter: flagged conversations rendered for manual
//! inspection.

use serde::{Deserialize, Serialize};
use threadshape_core::errors::{PipelineResult, ReportError};
use threadshape_core::traits::CorpusStore;

use super::structure::{reply_tree, StructureLine};
use crate::anomaly::{ComponentAnomalies, Polarity};

/// One flagged conversation with its reply structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedExample {
    pub component: usize,
    pub polarity: Polarity,
    /// Conversation index in tensor enumeration order.
    pub index: usize,
    pub conversation_id: String,
    pub group: String,
    pub lines: Vec<StructureLine>,
}

/// Resolved examples plus the per-item failures that were skipped.
pub type ExampleReport = PipelineResult<Vec<DetailedExample>>;

pub struct DetailedExampleReporter<'a> {
    corpus: &'a dyn CorpusStore,
    max_examples: Option<usize>,
}

impl<'a> DetailedExampleReporter<'a> {
    pub fn new(corpus: &'a dyn CorpusStore, max_examples: Option<usize>) -> Self {
        Self {
            corpus,
            max_examples,
        }
    }

    /// Resolve every flagged conversation index of every component.
    ///
    /// Items that cannot be resolved are logged and recorded in the report's
    /// errors; they never stop the remaining items.
    pub fn report(&self, anomalies: &[ComponentAnomalies], entity_ids: &[String]) -> ExampleReport {
        let mut report = ExampleReport::default();
        for component in anomalies {
            for polarity in Polarity::ALL {
                let indices = component.indices(polarity);
                let cap = self.max_examples.unwrap_or(indices.len());
                for &index in indices.iter().take(cap) {
                    match self.resolve(component.component, polarity, index, entity_ids) {
                        Ok(example) => report.data.push(example),
                        Err(err) => {
                            tracing::warn!(
                                component = component.component,
                                polarity = %polarity,
                                index,
                                error = %err,
                                "skipping unresolvable example"
                            );
                            report.add_error(err);
                        }
                    }
                }
            }
        }
        tracing::info!(
            examples = report.data.len(),
            failures = report.error_count(),
            "detailed examples resolved"
        );
        report
    }

    fn resolve(
        &self,
        component: usize,
        polarity: Polarity,
        index: usize,
        entity_ids: &[String],
    ) -> Result<DetailedExample, ReportError> {
        let id = entity_ids.get(index).ok_or(ReportError::IndexOutOfRange {
            index,
            len: entity_ids.len(),
        })?;
        let conversation = self
            .corpus
            .conversation(id)
            .map_err(|source| ReportError::ResolutionFailure { index, source })?;
        Ok(DetailedExample {
            component,
            polarity,
            index,
            lines: reply_tree(&conversation),
            conversation_id: conversation.id,
            group: conversation.group,
        })
    }
}
