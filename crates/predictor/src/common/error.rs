//! Predictor error definitions.
//!
//! This module defines the failure modes of the predictor core. It provides:
//! 1. **Configuration Errors:** Raised while validating a [`PredictorConfig`](crate::config::PredictorConfig); never occur mid-run.
//! 2. **Token Contract Violations:** Raised when a handed-back prediction token does not match a live slot of its thread.
//! 3. **Predictor Errors:** The umbrella type returned by every runtime operation.

use thiserror::Error;

/// Rejected predictor geometry.
///
/// Construction is the only place these can occur; a predictor that was built
/// successfully never reports a configuration error again.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The global history size must be a power of two so that the history
    /// register mask covers it exactly.
    #[error("history size {0} is not a power of two")]
    NonPowerOfTwoHistorySize(usize),

    /// The register width derived from the history size cannot hold the
    /// history positions (or leaves no sign bit for the weights).
    #[error("history size {history_size} needs a {bits}-bit history register (supported: 1..={max_bits})")]
    HistoryWidthOverflow {
        /// Requested history size.
        history_size: usize,
        /// Register width derived from it.
        bits: u32,
        /// Widest register the predictor supports.
        max_bits: u32,
    },

    /// At least one perceptron row is required.
    #[error("perceptron count must be non-zero")]
    NoPerceptrons,

    /// At least one hardware thread is required.
    #[error("thread count must be non-zero")]
    NoThreads,
}

/// Misuse of a [`PredictionToken`](crate::bru::token::PredictionToken).
///
/// These are caller programming errors. They are fatal for the simulation and
/// are never produced by a correctly sequenced pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token was already consumed by `resolve` or `squash`.
    #[error("prediction token in slot {slot} was already consumed")]
    Released {
        /// Arena slot the token referred to.
        slot: u32,
    },

    /// The token does not refer to any slot of this predictor.
    #[error("prediction token in slot {slot} does not belong to this predictor")]
    Unknown {
        /// Arena slot the token referred to.
        slot: u32,
    },

    /// The token was created for a different hardware thread.
    #[error("prediction token created on thread {owner} was handed back on thread {tid}")]
    ThreadMismatch {
        /// Thread that created the token.
        owner: usize,
        /// Thread that tried to consume it.
        tid: usize,
    },
}

/// Error type for all predictor operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PredictorError {
    /// Token contract violation.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The thread id is outside the configured thread count.
    #[error("thread {tid} out of range (predictor has {threads} threads)")]
    UnknownThread {
        /// Offending thread id.
        tid: usize,
        /// Configured thread count.
        threads: usize,
    },
}

/// Convenience alias for results of predictor operations.
pub type Result<T> = std::result::Result<T, PredictorError>;
