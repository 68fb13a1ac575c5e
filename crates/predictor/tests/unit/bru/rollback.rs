//! Rollback Tests.
//!
//! Squash must restore the speculative history and running sums to the
//! committed copies; a missing branch target degrades only the committed
//! history. The weight table, path, and running sums are shared between
//! threads, so speculation on one thread is visible to the others.

use neuropath_core::DirectionPredictor;
use pretty_assertions::assert_eq;

use crate::common::{neuropath, snapshot};

const PC: u64 = 0x100;

#[test]
fn predict_then_squash_restores_committed_state() {
    let mut bp = neuropath(8, 1);
    // Train a little first so the running sums are non-trivial.
    for taken in [false, true, false, false] {
        let p = bp.predict(0, PC).unwrap();
        bp.resolve(0, PC, taken, p.token, false).unwrap();
    }
    let p = bp.predict(0, PC).unwrap();
    bp.squash(0, p.token).unwrap();

    assert_eq!(bp.speculative_history(0), bp.committed_history(0));
    assert_eq!(bp.speculative_sums(), bp.committed_sums());
    assert_eq!(bp.stats().squashes, 1);
}

#[test]
fn squash_discards_every_younger_prediction() {
    let mut bp = neuropath(8, 1);
    let committed = bp.predict(0, PC).unwrap();
    bp.resolve(0, PC, false, committed.token, false).unwrap();
    let before = snapshot(&bp, 1);

    let tokens: Vec<_> = (0..3u64)
        .map(|i| bp.predict(0, PC + 4 * i).unwrap().token)
        .collect();
    assert_ne!(bp.speculative_history(0), before.speculative.first().copied());

    // Pipeline flush: youngest first.
    for token in tokens.into_iter().rev() {
        bp.squash(0, token).unwrap();
    }
    let after = snapshot(&bp, 1);

    assert_eq!(after.committed, before.committed);
    assert_eq!(after.speculative, after.committed);
    assert_eq!(after.sr, before.r);
    assert_eq!(after.weights, before.weights, "squash never trains");
    assert_eq!(bp.in_flight(), 0);
}

#[test]
fn missing_target_clears_committed_low_bit_only() {
    let mut bp = neuropath(8, 1);
    let p = bp.predict(0, PC).unwrap();
    bp.resolve(0, PC, true, p.token, false).unwrap();
    assert_eq!(bp.committed_history(0), Some(0b001));

    let p = bp.predict(0, PC).unwrap();
    let spec_before = bp.speculative_history(0);
    let sums_before = bp.speculative_sums().to_vec();

    bp.on_missing_target(0, PC).unwrap();

    assert_eq!(bp.committed_history(0), Some(0b000));
    assert_eq!(bp.speculative_history(0), spec_before);
    assert_eq!(bp.speculative_sums(), sums_before.as_slice());
    assert_eq!(bp.stats().missing_targets, 1);
    bp.squash(0, p.token).unwrap();
}

#[test]
fn squash_only_restores_its_own_thread_history() {
    let mut bp = neuropath(8, 2);
    let t0 = bp.predict(0, PC).unwrap();
    let t1 = bp.predict(1, PC).unwrap();
    assert_eq!(bp.speculative_history(1), Some(0b001));

    bp.squash(0, t0.token).unwrap();
    assert_eq!(bp.speculative_history(0), Some(0));
    assert_eq!(bp.speculative_history(1), Some(0b001), "thread 1 SG is untouched");

    bp.resolve(1, PC, true, t1.token, false).unwrap();
}

#[test]
fn running_sums_are_shared_between_threads() {
    let mut bp = neuropath(4, 2);
    // Make row 6's history weights non-zero: [1, 1, 1, 1].
    let p = bp.predict(0, PC).unwrap();
    bp.resolve(0, PC, false, p.token, false).unwrap();
    let sr_before = bp.speculative_sums().to_vec();
    let thread0 = (bp.committed_history(0), bp.speculative_history(0));

    let p = bp.predict(1, PC).unwrap();
    assert_ne!(bp.speculative_sums(), sr_before.as_slice());
    assert_eq!((bp.committed_history(0), bp.speculative_history(0)), thread0);

    // A squash on thread 1 rolls back the shared sums for thread 0 as well.
    bp.squash(1, p.token).unwrap();
    assert_eq!(bp.speculative_sums(), bp.committed_sums());
}
