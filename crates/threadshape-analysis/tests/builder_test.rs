//! FeatureMatrixBuilder against tensor-backed and scripted extractors.

use test_fixtures::{feature_names, grouped_corpus, spike_tensor, FnExtractor, MemoryCorpus, TensorExtractor};
use threadshape_analysis::FeatureMatrixBuilder;
use threadshape_core::config::TensorConfig;
use threadshape_core::errors::{PipelineError, TensorError};
use threadshape_core::traits::CorpusStore;
use threadshape_core::types::{FeatureSnapshot, Tensor3};

fn config(min: usize, max: usize) -> TensorConfig {
    TensorConfig {
        horizon_min: Some(min),
        horizon_max: Some(max),
        ..Default::default()
    }
}

fn five_conversations() -> MemoryCorpus {
    grouped_corpus(&["a", "a", "a", "b", "b"])
}

#[test]
fn tensor_slots_match_extractor_snapshots() {
    let corpus = five_conversations();
    let ids = corpus.conversation_ids().unwrap();
    let source = spike_tensor();
    let extractor = TensorExtractor::new(source.clone(), &ids, feature_names(3), 3);

    let build = FeatureMatrixBuilder::new(&extractor, &config(3, 4)).build(&corpus).unwrap();
    assert_eq!(build.tensor, source);
    assert_eq!(build.horizons, vec![3, 4]);
    assert_eq!(build.entity_ids, ids);
    assert_eq!(build.group_labels, vec!["a", "a", "a", "b", "b"]);
    assert_eq!(build.feature_names, feature_names(3));
    assert_eq!(build.imputed_cells, 0);
    // exactly one call per (conversation, horizon)
    assert_eq!(extractor.calls(), 5 * 2);
}

#[test]
fn missing_values_are_imputed() {
    let corpus = five_conversations();
    let ids = corpus.conversation_ids().unwrap();
    let mut source = spike_tensor().data().to_vec();
    source[0] = f64::NAN;
    source[7] = f64::INFINITY;
    let source = Tensor3::from_vec([2, 5, 3], source).unwrap();
    let extractor = TensorExtractor::new(source, &ids, feature_names(3), 3);

    let mut cfg = config(3, 4);
    cfg.impute_value = Some(-7.0);
    let build = FeatureMatrixBuilder::new(&extractor, &cfg).build(&corpus).unwrap();
    assert_eq!(build.imputed_cells, 2);
    assert_eq!(build.tensor.data()[0], -7.0);
    assert_eq!(build.tensor.data()[7], -7.0);
    assert_eq!(build.tensor.missing_count(), 0);
}

#[test]
fn configured_feature_count_is_enforced() {
    let corpus = five_conversations();
    let ids = corpus.conversation_ids().unwrap();
    let extractor = TensorExtractor::new(spike_tensor(), &ids, feature_names(3), 3);
    let mut cfg = config(3, 4);
    cfg.feature_count = Some(4);

    match FeatureMatrixBuilder::new(&extractor, &cfg).build(&corpus) {
        Err(PipelineError::Tensor(TensorError::ShapeMismatch {
            conversation_id,
            horizon,
            expected,
            actual,
        })) => {
            assert_eq!(conversation_id, "c0");
            assert_eq!(horizon, 3);
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("expected ShapeMismatch, got {other:?}"),
    }
}

#[test]
fn later_snapshot_with_different_length_aborts() {
    let corpus = five_conversations();
    let extractor = FnExtractor::new(|c, h| {
        let n = if c.id == "c2" && h == 4 { 2 } else { 3 };
        Ok(feature_names(n).into_iter().map(|f| (f, 1.0)).collect::<FeatureSnapshot>())
    });
    let err = FeatureMatrixBuilder::new(&extractor, &config(3, 4)).build(&corpus).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Tensor(TensorError::ShapeMismatch { ref conversation_id, horizon: 4, expected: 3, actual: 2 })
            if conversation_id == "c2"
    ));
}

#[test]
fn values_are_placed_by_name() {
    let corpus = grouped_corpus(&["a", "b"]);
    let extractor = FnExtractor::new(|c, _h| {
        let snapshot: FeatureSnapshot = if c.id == "c0" {
            [("x", 1.0), ("y", 2.0)].into_iter().collect()
        } else {
            [("y", 20.0), ("x", 10.0)].into_iter().collect()
        };
        Ok(snapshot)
    });
    let build = FeatureMatrixBuilder::new(&extractor, &config(3, 3)).build(&corpus).unwrap();
    assert_eq!(build.feature_names, vec!["x", "y"]);
    assert_eq!(build.tensor.fiber(0, 1), &[10.0, 20.0]);
}

#[test]
fn unknown_feature_name_aborts() {
    let corpus = grouped_corpus(&["a", "b"]);
    let extractor = FnExtractor::new(|c, _h| {
        let other = if c.id == "c0" { "y" } else { "z" };
        Ok([("x", 1.0), (other, 2.0)].into_iter().collect::<FeatureSnapshot>())
    });
    let err = FeatureMatrixBuilder::new(&extractor, &config(3, 3)).build(&corpus).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Tensor(TensorError::FeatureNameMismatch { ref name, .. }) if name == "z"
    ));
}

#[test]
fn extractor_failure_aborts() {
    let corpus = five_conversations();
    let ids = corpus.conversation_ids().unwrap();
    let extractor = TensorExtractor::new(spike_tensor(), &ids, feature_names(3), 3);
    // horizon 5 is outside the fixture's two horizons
    let err = FeatureMatrixBuilder::new(&extractor, &config(3, 5)).build(&corpus).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Tensor(TensorError::ExtractionFailed { horizon: 5, .. })
    ));
}

#[test]
fn empty_corpus_is_rejected() {
    let corpus = MemoryCorpus::default();
    let extractor = FnExtractor::new(|_, _| {
        Ok(FeatureSnapshot::new())
    });
    let err = FeatureMatrixBuilder::new(&extractor, &config(3, 4)).build(&corpus).unwrap_err();
    assert!(matches!(err, PipelineError::Tensor(TensorError::EmptyCorpus)));
}
