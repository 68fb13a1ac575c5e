//! Branch direction prediction unit (BRU).
//!
//! This module contains the speculative direction predictors and the building
//! blocks they share: saturating weights, path history, per-thread history
//! registers, running partial sums, and the prediction token arena.

pub use self::branch_predictor::{DirectionPredictor, Prediction};
pub use self::token::PredictionToken;

/// Direction predictor trait and lookup result.
pub mod branch_predictor;

/// Per-thread committed and speculative global history registers.
pub mod history;

/// Path-based perceptron predictor.
pub mod neuropath;

/// Recent branch address path.
pub mod path;

/// Speculative and committed running partial sums.
pub mod running_sum;

/// Static branch predictor (always taken).
pub mod static_bp;

/// Prediction token handles and their slot arena.
pub mod token;

/// Saturating perceptron weight table.
pub mod weights;

use self::{neuropath::NeuroPathPredictor, static_bp::StaticPredictor};
use crate::common::{Addr, ConfigError, Result, ThreadId};
use crate::config::{PredictorConfig, PredictorKind};
use crate::stats::PredictorStats;

/// Enum wrapper for static dispatch of direction predictors.
/// This avoids vtable lookups in the critical fetch loop.
#[derive(Debug, Clone)]
pub enum PredictorWrapper {
    /// Path-based perceptron predictor.
    NeuroPath(NeuroPathPredictor),
    /// Always-taken predictor.
    Static(StaticPredictor),
}

impl PredictorWrapper {
    /// Creates the predictor selected by `config.kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &PredictorConfig) -> std::result::Result<Self, ConfigError> {
        Ok(match config.kind {
            PredictorKind::NeuroPath => Self::NeuroPath(NeuroPathPredictor::new(config)?),
            PredictorKind::Static => Self::Static(StaticPredictor::new(config)?),
        })
    }
}

impl DirectionPredictor for PredictorWrapper {
    #[inline(always)]
    fn predict(&mut self, tid: ThreadId, addr: Addr) -> Result<Prediction> {
        match self {
            Self::NeuroPath(bp) => bp.predict(tid, addr),
            Self::Static(bp) => bp.predict(tid, addr),
        }
    }

    #[inline(always)]
    fn predict_unconditional(&mut self, tid: ThreadId, addr: Addr) -> Result<PredictionToken> {
        match self {
            Self::NeuroPath(bp) => bp.predict_unconditional(tid, addr),
            Self::Static(bp) => bp.predict_unconditional(tid, addr),
        }
    }

    #[inline(always)]
    fn on_missing_target(&mut self, tid: ThreadId, addr: Addr) -> Result<()> {
        match self {
            Self::NeuroPath(bp) => bp.on_missing_target(tid, addr),
            Self::Static(bp) => bp.on_missing_target(tid, addr),
        }
    }

    #[inline(always)]
    fn resolve(
        &mut self,
        tid: ThreadId,
        addr: Addr,
        actual_taken: bool,
        token: PredictionToken,
        was_squashed: bool,
    ) -> Result<()> {
        match self {
            Self::NeuroPath(bp) => bp.resolve(tid, addr, actual_taken, token, was_squashed),
            Self::Static(bp) => bp.resolve(tid, addr, actual_taken, token, was_squashed),
        }
    }

    #[inline(always)]
    fn squash(&mut self, tid: ThreadId, token: PredictionToken) -> Result<()> {
        match self {
            Self::NeuroPath(bp) => bp.squash(tid, token),
            Self::Static(bp) => bp.squash(tid, token),
        }
    }

    #[inline(always)]
    fn read_history(&self, token: &PredictionToken) -> Result<u32> {
        match self {
            Self::NeuroPath(bp) => bp.read_history(token),
            Self::Static(bp) => bp.read_history(token),
        }
    }

    #[inline(always)]
    fn stats(&self) -> &PredictorStats {
        match self {
            Self::NeuroPath(bp) => bp.stats(),
            Self::Static(bp) => bp.stats(),
        }
    }
}
