//! The four pipeline stages and the resumable `run` that chains them.
//!
//! Each stage reads its inputs from the artifact store and writes only its own
//! outputs. A failing stage leaves earlier artifacts untouched.

use std::time::Instant;

use threadshape_core::config::ThreadshapeConfig;
use threadshape_core::errors::{PipelineError, PipelineStage, ReportError, SolverError, StageError};
use threadshape_core::traits::artifact_store::encode;
use threadshape_core::traits::{ArtifactStore, ArtifactStoreExt, CorpusStore, CpSolver, FeatureExtractor};
use threadshape_core::types::{ArtifactKey, CpFactors, RankToFactors, Tensor3};

use crate::anomaly::AnomalyDetector;
use crate::decomposition::{DecompositionOrchestrator, DecompositionOutcome};
use crate::ranking::{GroupedRankingSummarizer, ReportTables, Summary};
use crate::report::{DetailedExampleReporter, ExampleReport};
use crate::tensor::{FeatureMatrixBuilder, TensorBuild};

/// Outcome of [`Pipeline::run`].
#[derive(Debug)]
pub struct RunReport {
    /// Whether the tensor stage ran (false when resumed from stored artifacts).
    pub built: bool,
    /// Whether the decomposition stage ran.
    pub decomposed: bool,
    /// Per-rank failures of the decomposition stage, when it ran.
    pub decomposition_failures: Vec<SolverError>,
    pub summary: Summary,
    pub examples: ExampleReport,
}

/// Stage runner bound to one configuration and one artifact store.
pub struct Pipeline<'a> {
    config: &'a ThreadshapeConfig,
    store: &'a dyn ArtifactStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ThreadshapeConfig, store: &'a dyn ArtifactStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ThreadshapeConfig {
        self.config
    }

    /// Assemble the tensor and persist it with its side tables in one batch,
    /// then drop any stored factors so they are recomputed for the new tensor.
    pub fn build_tensor(
        &self,
        corpus: &dyn CorpusStore,
        extractor: &dyn FeatureExtractor,
    ) -> Result<TensorBuild, StageError> {
        let stage = PipelineStage::BuildTensor;
        let build = FeatureMatrixBuilder::new(extractor, &self.config.tensor)
            .build(corpus)
            .map_err(|e| StageError::new(stage, e))?;

        // tensor last so a partial write by a non-transactional backend is
        // never mistaken for a complete stage
        let entries = vec![
            (ArtifactKey::GroupLabels, encode(ArtifactKey::GroupLabels, &build.group_labels)),
            (ArtifactKey::EntityIds, encode(ArtifactKey::EntityIds, &build.entity_ids)),
            (ArtifactKey::FeatureNames, encode(ArtifactKey::FeatureNames, &build.feature_names)),
            (ArtifactKey::Horizons, encode(ArtifactKey::Horizons, &build.horizons)),
            (ArtifactKey::Tensor, encode(ArtifactKey::Tensor, &build.tensor)),
        ];
        let entries = entries
            .into_iter()
            .map(|(key, bytes)| bytes.map(|b| (key, b)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StageError::new(stage, e))?;
        self.store
            .put_batch(&entries)
            .map_err(|e| StageError::new(stage, e))?;
        // factors computed from the previous tensor no longer describe this one
        self.store
            .delete(ArtifactKey::RankToFactors)
            .map_err(|e| StageError::new(stage, e))?;

        tracing::info!(
            stage = %stage,
            shape = ?build.tensor.shape(),
            imputed_cells = build.imputed_cells,
            "tensor artifacts persisted"
        );
        Ok(build)
    }

    /// Decompose the stored tensor at every configured rank and persist the
    /// successful ranks. Fails without writing when every rank fails.
    pub fn decompose(&self, solver: &dyn CpSolver) -> Result<DecompositionOutcome, StageError> {
        let stage = PipelineStage::Decompose;
        let started = Instant::now();
        let tensor: Tensor3 = self
            .store
            .get(ArtifactKey::Tensor)
            .map_err(|e| StageError::new(stage, e))?;

        let orchestrator = DecompositionOrchestrator::from_config(solver, &self.config.decomposition);
        let outcome = orchestrator.run(&tensor);
        if outcome.all_failed() {
            return Err(StageError::new(
                stage,
                PipelineError::AllRanksFailed {
                    failures: outcome.failures,
                },
            ));
        }

        self.store
            .put(ArtifactKey::RankToFactors, &outcome.factors)
            .map_err(|e| StageError::new(stage, e))?;
        tracing::info!(
            stage = %stage,
            ranks = ?outcome.factors.keys().collect::<Vec<_>>(),
            failed = outcome.failures.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "factors persisted"
        );
        Ok(outcome)
    }

    /// Rank groups, features and horizons per component at the report rank.
    pub fn summarize(&self) -> Result<Summary, StageError> {
        let stage = PipelineStage::Summarize;
        self.summarize_inner().map_err(|e| StageError::new(stage, e))
    }

    fn summarize_inner(&self) -> Result<Summary, PipelineError> {
        let all: RankToFactors = self.store.get(ArtifactKey::RankToFactors)?;
        let (rank, factors) = self.report_rank(&all)?;
        let group_labels: Vec<String> = self.store.get(ArtifactKey::GroupLabels)?;
        let feature_names: Vec<String> = self.store.get(ArtifactKey::FeatureNames)?;
        let horizons: Vec<usize> = self.store.get(ArtifactKey::Horizons)?;

        let detector = AnomalyDetector::from_config(&self.config.anomaly)?;
        let summary = GroupedRankingSummarizer::from_config(&self.config.report).summarize(
            rank,
            factors,
            &detector,
            ReportTables {
                group_labels: &group_labels,
                feature_names: &feature_names,
                horizons: &horizons,
            },
        )?;
        Ok(summary)
    }

    /// Resolve flagged conversations at the report rank to full records.
    pub fn detailed_examples(&self, corpus: &dyn CorpusStore) -> Result<ExampleReport, StageError> {
        let stage = PipelineStage::DetailedExamples;
        self.detailed_examples_inner(corpus)
            .map_err(|e| StageError::new(stage, e))
    }

    fn detailed_examples_inner(&self, corpus: &dyn CorpusStore) -> Result<ExampleReport, PipelineError> {
        let all: RankToFactors = self.store.get(ArtifactKey::RankToFactors)?;
        let (_, factors) = self.report_rank(&all)?;
        let entity_ids: Vec<String> = self.store.get(ArtifactKey::EntityIds)?;
        if entity_ids.len() != factors.conversation.nrows() {
            return Err(ReportError::LengthMismatch {
                table: "entity-ids",
                expected: factors.conversation.nrows(),
                actual: entity_ids.len(),
            }
            .into());
        }

        let detector = AnomalyDetector::from_config(&self.config.anomaly)?;
        let anomalies = detector.detect_all(&factors.conversation)?;
        let reporter = DetailedExampleReporter::new(corpus, self.config.report.max_examples);
        Ok(reporter.report(&anomalies, &entity_ids))
    }

    /// Run all four stages, skipping the tensor and decomposition stages when
    /// their artifacts already exist, unless `force` is set.
    pub fn run(
        &self,
        corpus: &dyn CorpusStore,
        extractor: &dyn FeatureExtractor,
        solver: &dyn CpSolver,
        force: bool,
    ) -> Result<RunReport, StageError> {
        let has = |keys: &[ArtifactKey], stage: PipelineStage| {
            self.store
                .contains_all(keys)
                .map_err(|e| StageError::new(stage, e))
        };

        let built = force || !has(&ArtifactKey::TENSOR_STAGE, PipelineStage::BuildTensor)?;
        if built {
            self.build_tensor(corpus, extractor)?;
        } else {
            tracing::info!(stage = %PipelineStage::BuildTensor, "artifacts present, skipping");
        }

        let decomposed = built || !has(&[ArtifactKey::RankToFactors], PipelineStage::Decompose)?;
        let decomposition_failures = if decomposed {
            self.decompose(solver)?.failures
        } else {
            tracing::info!(stage = %PipelineStage::Decompose, "artifacts present, skipping");
            Vec::new()
        };

        let summary = self.summarize()?;
        let examples = self.detailed_examples(corpus)?;
        Ok(RunReport {
            built,
            decomposed,
            decomposition_failures,
            summary,
            examples,
        })
    }

    /// The configured report rank, or the largest persisted rank.
    fn report_rank<'f>(&self, all: &'f RankToFactors) -> Result<(usize, &'f CpFactors), ReportError> {
        match self.config.report.rank {
            Some(rank) => all
                .get(&rank)
                .map(|f| (rank, f))
                .ok_or(ReportError::RankNotAvailable { rank }),
            None => all
                .iter()
                .next_back()
                .map(|(&rank, f)| (rank, f))
                .ok_or(ReportError::RankNotAvailable { rank: 0 }),
        }
    }
}
