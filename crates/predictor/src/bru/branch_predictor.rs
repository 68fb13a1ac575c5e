//! Direction Predictor Interface.
//!
//! This module defines the `DirectionPredictor` trait: the closed operation set
//! the fetch/execute pipeline uses to drive a speculative direction predictor.
//! The pipeline predicts at fetch, carries the returned token with the
//! instruction, and later hands it back exactly once, either to `resolve` when
//! the branch executes or to `squash` when its path is discarded.

use super::token::PredictionToken;
use crate::common::{Addr, Result, ThreadId};
use crate::stats::PredictorStats;

/// Outcome of a conditional branch lookup.
#[derive(Debug, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// Handle to hand back on resolution or squash.
    pub token: PredictionToken,
}

/// Trait for speculative branch direction predictors.
///
/// All operations run to completion on the caller's thread. Thread ids select
/// the per-thread history registers; every other structure may be shared
/// between threads.
pub trait DirectionPredictor {
    /// Predicts the direction of the conditional branch at `addr`.
    ///
    /// # Errors
    ///
    /// [`PredictorError::UnknownThread`](crate::common::PredictorError::UnknownThread)
    /// if `tid` is out of range.
    #[must_use = "the returned token must be handed back to `resolve` or `squash`"]
    fn predict(&mut self, tid: ThreadId, addr: Addr) -> Result<Prediction>;

    /// Records an unconditional branch at `addr` (always taken).
    ///
    /// # Errors
    ///
    /// As [`DirectionPredictor::predict`].
    #[must_use = "the returned token must be handed back to `resolve` or `squash`"]
    fn predict_unconditional(&mut self, tid: ThreadId, addr: Addr) -> Result<PredictionToken>;

    /// Marks the most recent committed outcome of `tid` as not-taken because
    /// no valid branch target was found for `addr`.
    ///
    /// # Errors
    ///
    /// As [`DirectionPredictor::predict`].
    fn on_missing_target(&mut self, tid: ThreadId, addr: Addr) -> Result<()>;

    /// Trains the predictor with the resolved outcome of the branch at `addr`.
    ///
    /// `was_squashed` is set when the branch was mispredicted and the younger
    /// speculative path has been discarded; speculative state is then rolled
    /// back to the committed state before training.
    ///
    /// # Errors
    ///
    /// A token contract violation if `token` was rebuilt for a slot that has
    /// since been released, belongs to another thread, or was never issued.
    /// No state is modified in that case.
    fn resolve(
        &mut self,
        tid: ThreadId,
        addr: Addr,
        actual_taken: bool,
        token: PredictionToken,
        was_squashed: bool,
    ) -> Result<()>;

    /// Discards the prediction behind `token` and rolls speculative state back
    /// to the committed state.
    ///
    /// # Errors
    ///
    /// As [`DirectionPredictor::resolve`].
    fn squash(&mut self, tid: ThreadId, token: PredictionToken) -> Result<()>;

    /// Speculative history captured when `token` was created.
    ///
    /// # Errors
    ///
    /// A token contract violation if `token` is not live.
    fn read_history(&self, token: &PredictionToken) -> Result<u32>;

    /// Event counters.
    fn stats(&self) -> &PredictorStats;
}
