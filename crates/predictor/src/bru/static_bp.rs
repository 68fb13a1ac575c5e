//! Static Branch Predictor.
//!
//! Implements an "Always Taken" prediction policy. It keeps the per-thread
//! history registers and the token contract of the dynamic predictors, so it
//! can stand in for them in a pipeline, but never learns.

use tracing::trace;

use super::branch_predictor::{DirectionPredictor, Prediction};
use super::history::HistoryRegisters;
use super::token::{PredictionToken, TokenArena, TokenEntry};
use crate::common::{Addr, ConfigError, PredictorError, Result, ThreadId};
use crate::config::PredictorConfig;
use crate::stats::PredictorStats;

/// Static Branch Predictor structure.
#[derive(Debug, Clone)]
pub struct StaticPredictor {
    /// Per-thread committed and speculative global history.
    history: HistoryRegisters,
    /// In-flight prediction tokens.
    tokens: TokenArena,
    /// Event counters.
    stats: PredictorStats,
}

impl StaticPredictor {
    /// Creates a new Static Predictor.
    ///
    /// The configuration is validated like the dynamic predictors' so that
    /// history registers have the same width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid geometry.
    pub fn new(config: &PredictorConfig) -> std::result::Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        Ok(Self {
            history: HistoryRegisters::new(config.thread_count, geometry.history_mask),
            tokens: TokenArena::new(config.token_capacity),
            stats: PredictorStats::default(),
        })
    }

    /// Committed global history `G[tid]`, or `None` for an unknown thread.
    pub fn committed_history(&self, tid: ThreadId) -> Option<u32> {
        self.history.get(tid).map(|h| h.committed)
    }

    /// Speculative global history `SG[tid]`, or `None` for an unknown thread.
    pub fn speculative_history(&self, tid: ThreadId) -> Option<u32> {
        self.history.get(tid).map(|h| h.speculative)
    }

    fn check_thread(&self, tid: ThreadId) -> Result<()> {
        if tid < self.history.len() {
            Ok(())
        } else {
            Err(PredictorError::UnknownThread {
                tid,
                threads: self.history.len(),
            })
        }
    }

    fn issue(&mut self, tid: ThreadId, unconditional: bool) -> PredictionToken {
        let token = self.tokens.allocate(TokenEntry {
            tid,
            history: self.history.speculative(tid),
            predicted_taken: true,
            unconditional,
        });
        self.history.speculate(tid, true);
        token
    }
}

impl DirectionPredictor for StaticPredictor {
    /// Always predicts taken.
    fn predict(&mut self, tid: ThreadId, addr: Addr) -> Result<Prediction> {
        self.check_thread(tid)?;
        let token = self.issue(tid, false);
        self.stats.lookups += 1;
        trace!(tid, addr, slot = token.slot(), "static predict");
        Ok(Prediction { taken: true, token })
    }

    fn predict_unconditional(&mut self, tid: ThreadId, addr: Addr) -> Result<PredictionToken> {
        self.check_thread(tid)?;
        let token = self.issue(tid, true);
        self.stats.unconditional += 1;
        trace!(tid, addr, slot = token.slot(), "static unconditional");
        Ok(token)
    }

    fn on_missing_target(&mut self, tid: ThreadId, addr: Addr) -> Result<()> {
        self.check_thread(tid)?;
        self.history.clear_committed_low_bit(tid);
        self.stats.missing_targets += 1;
        trace!(tid, addr, "static missing target");
        Ok(())
    }

    /// Commits the outcome to `G[tid]`; there is nothing to train.
    fn resolve(
        &mut self,
        tid: ThreadId,
        addr: Addr,
        actual_taken: bool,
        token: PredictionToken,
        was_squashed: bool,
    ) -> Result<()> {
        self.check_thread(tid)?;
        let slot = token.slot();
        let entry = self.tokens.release(token, tid)?;

        self.history.commit(tid, actual_taken);
        if was_squashed {
            self.history.restore(tid);
            self.stats.squashed_resolutions += 1;
        }

        self.stats.resolutions += 1;
        if !entry.unconditional {
            self.stats.conditional_resolutions += 1;
            if !actual_taken {
                self.stats.mispredictions += 1;
            }
        }
        trace!(tid, addr, actual_taken, was_squashed, slot, "static resolve");
        Ok(())
    }

    fn squash(&mut self, tid: ThreadId, token: PredictionToken) -> Result<()> {
        self.check_thread(tid)?;
        let slot = token.slot();
        let _ = self.tokens.release(token, tid)?;
        self.history.restore(tid);
        self.stats.squashes += 1;
        trace!(tid, slot, "static squash");
        Ok(())
    }

    fn read_history(&self, token: &PredictionToken) -> Result<u32> {
        Ok(self.tokens.get(token)?.history)
    }

    fn stats(&self) -> &PredictorStats {
        &self.stats
    }
}
