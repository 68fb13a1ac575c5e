//! Predictor statistics collection and reporting.
//!
//! This module tracks the event counts of a predictor instance. It provides:
//! 1. **Lookups:** Conditional and unconditional predictions issued.
//! 2. **Resolution:** Resolved branches, mispredictions, and derived accuracy.
//! 3. **Training and rollback:** Weight training events, squashes, and missing-target updates.

use std::fmt;

use serde::Serialize;

/// Event counters for a single predictor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictorStats {
    /// Conditional predictions issued.
    pub lookups: u64,
    /// Unconditional branches recorded.
    pub unconditional: u64,
    /// Branches resolved (conditional and unconditional).
    pub resolutions: u64,
    /// Resolved conditional branches.
    pub conditional_resolutions: u64,
    /// Resolved conditional branches whose predicted direction was wrong.
    pub mispredictions: u64,
    /// Resolutions that trained the weights.
    pub trainings: u64,
    /// Tokens discarded through `squash`.
    pub squashes: u64,
    /// Resolutions that rolled speculative state back inline.
    pub squashed_resolutions: u64,
    /// Committed history updates for branches without a valid target.
    pub missing_targets: u64,
}

impl PredictorStats {
    /// Fraction of resolved conditional branches that were predicted correctly.
    ///
    /// Returns `0.0` before any conditional branch has resolved.
    pub fn accuracy(&self) -> f64 {
        if self.conditional_resolutions == 0 {
            return 0.0;
        }
        let correct = self.conditional_resolutions - self.mispredictions;
        correct as f64 / self.conditional_resolutions as f64
    }

    /// Serializes the counters as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for PredictorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BRANCH PREDICTION")?;
        writeln!(f, "  bp.lookups             {}", self.lookups)?;
        writeln!(f, "  bp.unconditional       {}", self.unconditional)?;
        writeln!(f, "  bp.resolved            {}", self.resolutions)?;
        writeln!(f, "  bp.mispredicts         {}", self.mispredictions)?;
        writeln!(f, "  bp.accuracy            {:.2}%", self.accuracy() * 100.0)?;
        writeln!(f, "  bp.trainings           {}", self.trainings)?;
        writeln!(f, "  bp.squashes            {}", self.squashes)?;
        writeln!(f, "  bp.squashed_updates    {}", self.squashed_resolutions)?;
        write!(f, "  bp.missing_targets     {}", self.missing_targets)
    }
}
