//! Token Contract Tests.
//!
//! A token is consumed by exactly one `resolve` or `squash`; the type system
//! rules out a second hand-back of the same value. Handles rebuilt from raw
//! parts are still checked against the arena, and any mismatch is reported
//! without touching predictor state.

use neuropath_core::{DirectionPredictor, PredictionToken, PredictorError, TokenError};
use pretty_assertions::assert_eq;

use crate::common::{neuropath, snapshot};

const PC: u64 = 0x2000;

/// Rebuilds a second handle for the same slot and generation.
fn duplicate(token: &PredictionToken) -> PredictionToken {
    PredictionToken::from_raw(token.slot(), token.generation())
}

#[test]
fn rebuilt_token_after_resolve_is_rejected() {
    let mut bp = neuropath(8, 1);
    let p = bp.predict(0, PC).unwrap();
    let copy = duplicate(&p.token);
    let slot = p.token.slot();
    bp.resolve(0, PC, true, p.token, false).unwrap();
    let before = snapshot(&bp, 1);

    let err = bp.resolve(0, PC, false, copy, false).unwrap_err();
    assert_eq!(err, PredictorError::Token(TokenError::Released { slot }));
    assert_eq!(snapshot(&bp, 1), before);
    assert_eq!(bp.stats().resolutions, 1);
}

#[test]
fn squash_after_resolve_is_rejected() {
    let mut bp = neuropath(8, 1);
    let p = bp.predict(0, PC).unwrap();
    let copy = duplicate(&p.token);
    bp.resolve(0, PC, false, p.token, true).unwrap();
    let before = snapshot(&bp, 1);

    assert!(matches!(
        bp.squash(0, copy),
        Err(PredictorError::Token(TokenError::Released { .. }))
    ));
    assert_eq!(snapshot(&bp, 1), before);
    assert_eq!(bp.stats().squashes, 0);
}

#[test]
fn resolve_after_squash_is_rejected() {
    let mut bp = neuropath(8, 1);
    let p = bp.predict(0, PC).unwrap();
    let copy = duplicate(&p.token);
    bp.squash(0, p.token).unwrap();

    assert!(bp.read_history(&copy).is_err());
    assert!(matches!(
        bp.resolve(0, PC, true, copy, true),
        Err(PredictorError::Token(TokenError::Released { .. }))
    ));
}

#[test]
fn stale_token_does_not_alias_recycled_slot() {
    let mut bp = neuropath(8, 1);
    let old = bp.predict(0, PC).unwrap();
    let stale = duplicate(&old.token);
    bp.squash(0, old.token).unwrap();

    let new = bp.predict(0, PC).unwrap();
    assert_eq!(new.token.slot(), stale.slot());
    assert!(bp.squash(0, stale).is_err());
    // The live token is unaffected.
    bp.squash(0, new.token).unwrap();
    assert_eq!(bp.in_flight(), 0);
}

#[test]
fn foreign_token_is_unknown() {
    let mut bp = neuropath(8, 1);
    let forged = PredictionToken::from_raw(10_000, 0);
    assert_eq!(
        bp.read_history(&forged),
        Err(PredictorError::Token(TokenError::Unknown { slot: 10_000 }))
    );
    assert_eq!(
        bp.squash(0, forged),
        Err(PredictorError::Token(TokenError::Unknown { slot: 10_000 }))
    );
}

#[test]
fn token_cannot_cross_threads() {
    let mut bp = neuropath(8, 2);
    let p = bp.predict(1, PC).unwrap();
    let copy = duplicate(&p.token);
    let before = snapshot(&bp, 2);
    assert_eq!(
        bp.resolve(0, PC, true, p.token, false),
        Err(PredictorError::Token(TokenError::ThreadMismatch { owner: 1, tid: 0 }))
    );
    assert_eq!(snapshot(&bp, 2), before);
    // The slot is still reserved for thread 1.
    assert_eq!(bp.in_flight(), 1);
    bp.resolve(1, PC, true, copy, false).unwrap();
    assert_eq!(bp.in_flight(), 0);
}

#[test]
fn unknown_thread_is_rejected() {
    let mut bp = neuropath(8, 2);
    assert_eq!(
        bp.predict(2, PC).err(),
        Some(PredictorError::UnknownThread { tid: 2, threads: 2 })
    );
    assert!(bp.predict_unconditional(5, PC).is_err());
    assert!(bp.on_missing_target(2, PC).is_err());
    assert!(bp.path().is_empty());
}

#[test]
fn read_history_does_not_consume() {
    let mut bp = neuropath(8, 1);
    let first = bp.predict(0, PC).unwrap();
    let second = bp.predict(0, PC).unwrap();
    assert_eq!(bp.read_history(&second.token).unwrap(), 0b001);
    assert_eq!(bp.read_history(&second.token).unwrap(), 0b001);
    assert_eq!(bp.in_flight(), 2);

    bp.squash(0, second.token).unwrap();
    bp.squash(0, first.token).unwrap();
    assert_eq!(bp.in_flight(), 0);
}

#[test]
fn arena_grows_past_initial_capacity() {
    let mut config = neuropath_core::PredictorConfig::new(8, 1);
    config.token_capacity = 2;
    let mut bp = neuropath_core::NeuroPathPredictor::new(&config).unwrap();

    let tokens: Vec<_> = (0..5).map(|_| bp.predict(0, PC).unwrap().token).collect();
    assert_eq!(bp.in_flight(), 5);
    for token in tokens.into_iter().rev() {
        bp.squash(0, token).unwrap();
    }
    assert_eq!(bp.in_flight(), 0);
}

/// Handing every token back keeps the arena at its initial size however many
/// branches go through it.
#[test]
fn consumed_tokens_recycle_slots() {
    let mut config = neuropath_core::PredictorConfig::new(8, 1);
    config.token_capacity = 4;
    let mut bp = neuropath_core::NeuroPathPredictor::new(&config).unwrap();

    for i in 0..1_000u64 {
        let p = bp.predict(0, PC + 4 * (i % 16)).unwrap();
        assert!(p.token.slot() < 4);
        if i % 2 == 0 {
            bp.resolve(0, PC, p.taken, p.token, false).unwrap();
        } else {
            bp.squash(0, p.token).unwrap();
        }
    }
    assert_eq!(bp.in_flight(), 0);
}
