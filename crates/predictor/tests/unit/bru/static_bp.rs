//! Static Predictor and Variant Wrapper Tests.

use neuropath_core::bru::static_bp::StaticPredictor;
use neuropath_core::config::{PredictorConfig, PredictorKind};
use neuropath_core::{DirectionPredictor, PredictionToken, PredictorWrapper};
use pretty_assertions::assert_eq;

use crate::common::capture_traces;

fn static_config() -> PredictorConfig {
    PredictorConfig {
        kind: PredictorKind::Static,
        ..PredictorConfig::new(8, 2)
    }
}

/// Static predictor always predicts taken, whatever it is trained with.
#[test]
fn static_always_taken() {
    let mut bp = StaticPredictor::new(&static_config()).unwrap();
    for _ in 0..20 {
        let p = bp.predict(0, 0x1000).unwrap();
        assert!(p.taken);
        bp.resolve(0, 0x1000, false, p.token, true).unwrap();
    }
    assert_eq!(bp.stats().mispredictions, 20);
    assert_eq!(bp.stats().accuracy(), 0.0);
}

/// Static predictor keeps speculative and committed history like the dynamic ones.
#[test]
fn static_tracks_history() {
    let mut bp = StaticPredictor::new(&static_config()).unwrap();
    let a = bp.predict(1, 0x1000).unwrap();
    let b = bp.predict_unconditional(1, 0x1004).unwrap();
    assert_eq!(bp.read_history(&b).unwrap(), 0b001);
    assert_eq!(bp.speculative_history(1), Some(0b011));

    bp.resolve(1, 0x1000, false, a.token, true).unwrap();
    assert_eq!(bp.committed_history(1), Some(0));
    assert_eq!(bp.speculative_history(1), Some(0));

    let copy = PredictionToken::from_raw(b.slot(), b.generation());
    bp.squash(1, b).unwrap();
    assert!(bp.squash(1, copy).is_err());
    assert_eq!(bp.speculative_history(0), Some(0));
}

/// The wrapper builds the variant named in the config.
#[test]
fn wrapper_selects_variant() {
    let bp = PredictorWrapper::new(&static_config()).unwrap();
    assert!(matches!(bp, PredictorWrapper::Static(_)));

    let bp = PredictorWrapper::new(&PredictorConfig::new(8, 1)).unwrap();
    assert!(matches!(bp, PredictorWrapper::NeuroPath(_)));
}

/// The wrapper dispatches the whole operation set.
#[test]
fn wrapper_dispatches_operations() {
    let mut bp = PredictorWrapper::new(&PredictorConfig::new(4, 1)).unwrap();
    let p = bp.predict(0, 0x100).unwrap();
    assert!(p.taken);
    assert_eq!(bp.read_history(&p.token).unwrap(), 0);
    bp.resolve(0, 0x100, false, p.token, false).unwrap();

    let token = bp.predict_unconditional(0, 0x104).unwrap();
    bp.on_missing_target(0, 0x104).unwrap();
    bp.squash(0, token).unwrap();

    let stats = bp.stats();
    assert_eq!(stats.lookups, 1);
    assert_eq!(stats.unconditional, 1);
    assert_eq!(stats.trainings, 1);
    assert_eq!(stats.squashes, 1);
    assert_eq!(stats.missing_targets, 1);
}

/// Every static predictor operation emits a trace event.
#[test]
fn static_operations_are_traced() {
    let mut bp = StaticPredictor::new(&static_config()).unwrap();
    let logs = capture_traces(|| {
        let p = bp.predict(0, 0x1000).unwrap();
        bp.on_missing_target(0, 0x1000).unwrap();
        bp.squash(0, p.token).unwrap();
        let token = bp.predict_unconditional(0, 0x1004).unwrap();
        bp.resolve(0, 0x1004, true, token, false).unwrap();
    });
    for event in [
        "static predict",
        "static missing target",
        "static squash",
        "static unconditional",
        "static resolve",
    ] {
        assert!(logs.contains(event), "missing `{event}` in:\n{logs}");
    }
}
