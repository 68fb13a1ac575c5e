//! Running Sum Pipeline.
//!
//! Instead of computing a full dot product at prediction time, the path-based
//! predictor keeps a vector of partial sums where entry `k` holds the
//! contribution that will be complete `k` branches from now. Each branch adds
//! its row's weights to every pending sum and shifts the vector one step, so
//! `sums[H]` is always ready for the next prediction.
//!
//! Two copies are kept: the speculative `SR`, advanced with predicted
//! directions, and the committed `R`, advanced with resolved outcomes. A
//! squash restores `SR` from `R`.

/// Shiftable vector of partial perceptron sums (`H + 1` entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSums {
    sums: Vec<i64>,
}

impl RunningSums {
    /// Creates a zeroed vector for history length `history_size`.
    pub fn new(history_size: usize) -> Self {
        Self {
            sums: vec![0; history_size + 1],
        }
    }

    /// The fully accumulated sum used for the next prediction (`sums[H]`).
    #[inline]
    pub fn ready(&self) -> i64 {
        self.sums.last().copied().unwrap_or(0)
    }

    /// Advances every partial sum by one branch.
    ///
    /// `weights` are the history weights (columns `1..=H`) of the branch's row;
    /// `taken` selects whether they are added or subtracted. For `j` in `1..=H`
    /// with `k = H - j`, the new `sums[k + 1]` is the old `sums[k]` plus or
    /// minus column `j`. Entry 0 restarts at zero.
    pub fn advance(&mut self, weights: &[i32], taken: bool) {
        let h = self.sums.len() - 1;
        debug_assert_eq!(weights.len(), h);

        // Walk from the top so each source entry is read before it is overwritten.
        for k in (0..h).rev() {
            let w = i64::from(weights[h - k - 1]);
            self.sums[k + 1] = if taken { self.sums[k] + w } else { self.sums[k] - w };
        }
        self.sums[0] = 0;
    }

    /// Overwrites these sums with `other` (rollback of `SR` to `R`).
    pub fn restore_from(&mut self, other: &Self) {
        self.sums.clone_from_slice(&other.sums);
    }

    /// Raw partial sums, index `k` being the contribution `k` steps ahead.
    pub fn as_slice(&self) -> &[i64] {
        &self.sums
    }
}
