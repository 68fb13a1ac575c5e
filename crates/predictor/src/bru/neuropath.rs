//! Path-Based Perceptron Branch Predictor.
//!
//! A neural predictor in the style of the fast path-based perceptron. Rather
//! than computing a dot product of one row's weights with the history at
//! prediction time, each branch adds its row's weights into a pipeline of
//! running partial sums, so by the time a branch is fetched its output is the
//! bias of its row plus the sum accumulated along the path that led to it.
//!
//! Speculation is handled with two copies of everything that prediction
//! mutates: the speculative history `SG` and running sums `SR`, advanced with
//! predicted directions, and the committed history `G` and running sums `R`,
//! advanced with resolved outcomes. A squash copies the committed state over
//! the speculative state.
//!
//! The weight table, the path, and both running sum vectors are shared by all
//! hardware threads; only the history registers are per thread. Predictions on
//! one thread therefore observe in-flight speculation of the others.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(H) to advance the speculative sums
//!   - `resolve()`: O(H) to advance the committed sums and train
//!   - `squash()`: O(H) to restore the speculative sums
//! - **Space Complexity:** O(P × H) weights for P perceptron rows

use tracing::{debug, trace};

use super::branch_predictor::{DirectionPredictor, Prediction};
use super::history::HistoryRegisters;
use super::path::PathHistory;
use super::running_sum::RunningSums;
use super::token::{PredictionToken, TokenArena, TokenEntry};
use super::weights::WeightTable;
use crate::common::{Addr, ConfigError, PredictorError, Result, ThreadId};
use crate::config::{Geometry, PredictorConfig};
use crate::stats::PredictorStats;

/// Path-based perceptron predictor.
#[derive(Debug, Clone)]
pub struct NeuroPathPredictor {
    /// Validated table geometry.
    geometry: Geometry,
    /// Perceptron weights, shared across threads.
    weights: WeightTable,
    /// Recent branch addresses, shared across threads.
    path: PathHistory,
    /// Per-thread committed and speculative global history.
    history: HistoryRegisters,
    /// Speculative running sums (`SR`).
    speculative: RunningSums,
    /// Committed running sums (`R`).
    committed: RunningSums,
    /// In-flight prediction tokens.
    tokens: TokenArena,
    /// Event counters.
    stats: PredictorStats,
}

impl NeuroPathPredictor {
    /// Creates a predictor with all weights, histories and sums at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration does not describe a
    /// valid geometry (see [`PredictorConfig::geometry`]).
    pub fn new(config: &PredictorConfig) -> std::result::Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        debug!(
            history_size = geometry.history_size,
            history_bits = geometry.history_bits,
            perceptrons = geometry.perceptron_count,
            threads = config.thread_count,
            max_weight = geometry.max_weight,
            theta = geometry.theta,
            "path-based perceptron predictor configured"
        );

        Ok(Self {
            weights: WeightTable::new(&geometry),
            path: PathHistory::new(geometry.history_size + 1, geometry.perceptron_count),
            history: HistoryRegisters::new(config.thread_count, geometry.history_mask),
            speculative: RunningSums::new(geometry.history_size),
            committed: RunningSums::new(geometry.history_size),
            tokens: TokenArena::new(config.token_capacity),
            stats: PredictorStats::default(),
            geometry,
        })
    }

    /// Validated geometry of this predictor.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Weight at `(row, col)`; column 0 is the bias.
    pub fn weight(&self, row: usize, col: usize) -> i32 {
        self.weights.get(row, col)
    }

    /// The shared path history.
    pub const fn path(&self) -> &PathHistory {
        &self.path
    }

    /// Committed global history `G[tid]`, or `None` for an unknown thread.
    pub fn committed_history(&self, tid: ThreadId) -> Option<u32> {
        self.history.get(tid).map(|h| h.committed)
    }

    /// Speculative global history `SG[tid]`, or `None` for an unknown thread.
    pub fn speculative_history(&self, tid: ThreadId) -> Option<u32> {
        self.history.get(tid).map(|h| h.speculative)
    }

    /// Speculative running sums `SR`.
    pub fn speculative_sums(&self) -> &[i64] {
        self.speculative.as_slice()
    }

    /// Committed running sums `R`.
    pub fn committed_sums(&self) -> &[i64] {
        self.committed.as_slice()
    }

    /// Number of tokens the caller currently holds.
    pub fn in_flight(&self) -> usize {
        self.tokens.in_flight()
    }

    /// Perceptron output for `row`: its bias plus the accumulated speculative sum.
    #[inline]
    fn output(&self, row: usize) -> i64 {
        i64::from(self.weights.bias(row)) + self.speculative.ready()
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

    /// Rolls the speculative state of `tid` back to its committed state.
    ///
    /// The single rollback routine behind both `squash` and a squashed
    /// `resolve`. Each caller consumes its token first, so a token can drive
    /// at most one rollback.
    fn reconcile(&mut self, tid: ThreadId) {
        self.history.restore(tid);
        self.speculative.restore_from(&self.committed);
    }

    /// Trains the bias of `row` and one weight per history position.
    ///
    /// The weight for position `j` lives in the row of the branch `j` steps
    /// back along the path. `history` supplies the bits being correlated.
    fn train(&mut self, row: usize, history: u32, taken: bool) {
        self.weights.train(row, 0, taken);
        for j in 1..=self.geometry.history_size {
            let Some(trow) = self.path.training_row_for(j) else {
                break;
            };
            // Positions past the register width read as not-taken.
            let bit = history.checked_shr(j as u32).unwrap_or(0) & 1 == 1;
            self.weights.train(trow, j, bit == taken);
        }
        self.stats.trainings += 1;
    }
}

impl DirectionPredictor for NeuroPathPredictor {
    /// Predicts taken when the bias of the branch's row plus the accumulated
    /// speculative sum is non-negative, then advances `SR` and `SG[tid]` with
    /// the prediction.
    fn predict(&mut self, tid: ThreadId, addr: Addr) -> Result<Prediction> {
        self.check_thread(tid)?;
        self.path.record(addr);

        let row = self.path.row_for(addr);
        let y = self.output(row);
        let taken = y >= 0;

        let token = self.tokens.allocate(TokenEntry {
            tid,
            history: self.history.speculative(tid),
            predicted_taken: taken,
            unconditional: false,
        });

        self.speculative.advance(self.weights.history_weights(row), taken);
        self.history.speculate(tid, taken);
        self.stats.lookups += 1;

        trace!(tid, addr, row, y, taken, slot = token.slot(), "predict");
        Ok(Prediction { taken, token })
    }

    /// Records the branch on the path and shifts a taken bit into `SG[tid]`.
    /// The speculative sums are left alone.
    fn predict_unconditional(&mut self, tid: ThreadId, addr: Addr) -> Result<PredictionToken> {
        self.check_thread(tid)?;

        let token = self.tokens.allocate(TokenEntry {
            tid,
            history: self.history.speculative(tid),
            predicted_taken: true,
            unconditional: true,
        });

        self.path.record(addr);
        self.history.speculate(tid, true);
        self.stats.unconditional += 1;

        trace!(tid, addr, slot = token.slot(), "unconditional");
        Ok(token)
    }

    fn on_missing_target(&mut self, tid: ThreadId, addr: Addr) -> Result<()> {
        self.check_thread(tid)?;
        self.history.clear_committed_low_bit(tid);
        self.stats.missing_targets += 1;
        trace!(tid, addr, "missing target");
        Ok(())
    }

    /// Advances `R` and `G[tid]` with the actual outcome, rolls back if the
    /// path was squashed, and trains when squashed or when the output measured
    /// against the current speculative sum was within `theta`.
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

        let row = self.path.row_for(addr);
        let y = self.output(row);
        let prior_history = self.history.speculative(tid);

        self.committed.advance(self.weights.history_weights(row), actual_taken);
        self.history.commit(tid, actual_taken);

        if was_squashed {
            self.reconcile(tid);
            self.stats.squashed_resolutions += 1;
        }

        let low_confidence = y.unsigned_abs() as f64 <= self.geometry.theta;
        if was_squashed || low_confidence {
            if was_squashed {
                debug!(tid, addr, row, y, actual_taken, "training after squash");
            }
            self.train(row, prior_history, actual_taken);
        }

        self.stats.resolutions += 1;
        if !entry.unconditional {
            self.stats.conditional_resolutions += 1;
            if entry.predicted_taken != actual_taken {
                self.stats.mispredictions += 1;
            }
        }

        trace!(tid, addr, row, y, actual_taken, was_squashed, slot, "resolve");
        Ok(())
    }

    fn squash(&mut self, tid: ThreadId, token: PredictionToken) -> Result<()> {
        self.check_thread(tid)?;
        let slot = token.slot();
        let _ = self.tokens.release(token, tid)?;
        self.reconcile(tid);
        self.stats.squashes += 1;
        trace!(tid, slot, "squash");
        Ok(())
    }

    fn read_history(&self, token: &PredictionToken) -> Result<u32> {
        Ok(self.tokens.get(token)?.history)
    }

    fn stats(&self) -> &PredictorStats {
        &self.stats
    }
}
