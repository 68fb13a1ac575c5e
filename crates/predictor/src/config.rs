//! Configuration for the predictor core.
//!
//! This module defines the configuration structures used to size a predictor. It provides:
//! 1. **Defaults:** Baseline table geometry (history length, perceptron rows, threads).
//! 2. **Structures:** [`PredictorConfig`], deserializable from JSON with every field optional.
//! 3. **Geometry:** [`Geometry`], the validated set of masks, weight bounds and threshold
//!    derived from a config.
//!
//! Configuration is normally supplied by the surrounding simulator; use
//! `PredictorConfig::default()` when driving the core directly.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the predictor.
mod defaults {
    /// Default global history length / predictor table size.
    pub const HISTORY_SIZE: usize = 32;

    /// Number of hashed perceptron rows.
    ///
    /// Each row acts as a local predictor for the branches that hash to it.
    pub const PERCEPTRON_COUNT: usize = 10;

    /// Default number of hardware threads.
    pub const THREAD_COUNT: usize = 1;

    /// Initial number of prediction token slots.
    ///
    /// Sized for a generous in-flight branch window; the arena grows past it.
    pub const TOKEN_CAPACITY: usize = 256;
}

/// Widest history register supported.
///
/// History registers are 32-bit and weights are `i32`, so the derived width
/// must leave both representable.
pub const MAX_HISTORY_BITS: u32 = 31;

/// Coefficient of the training threshold (fast path-based neural predictor).
const THETA_COEFF: f64 = 2.14;
/// Bias of the training threshold.
const THETA_BIAS: f64 = 20.58;

/// Direction predictor variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    /// Path-based perceptron predictor with speculative running sums.
    #[default]
    #[serde(alias = "neuropath", alias = "perceptron")]
    NeuroPath,
    /// Always-taken static predictor.
    Static,
}

/// Predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    /// Predictor variant
    #[serde(default)]
    pub kind: PredictorKind,

    /// Global history length (must be a power of two)
    #[serde(default = "PredictorConfig::default_history_size")]
    pub history_size: usize,

    /// Number of perceptron rows
    #[serde(default = "PredictorConfig::default_perceptron_count")]
    pub perceptron_count: usize,

    /// Number of hardware threads
    #[serde(default = "PredictorConfig::default_thread_count")]
    pub thread_count: usize,

    /// Initial number of in-flight prediction token slots
    #[serde(default = "PredictorConfig::default_token_capacity")]
    pub token_capacity: usize,
}

impl PredictorConfig {
    /// Creates a path-based perceptron configuration with the given history
    /// size and thread count, leaving the remaining fields at their defaults.
    pub fn new(history_size: usize, thread_count: usize) -> Self {
        Self {
            history_size,
            thread_count,
            ..Self::default()
        }
    }

    /// Returns the default global history length.
    fn default_history_size() -> usize {
        defaults::HISTORY_SIZE
    }

    /// Returns the default number of perceptron rows.
    fn default_perceptron_count() -> usize {
        defaults::PERCEPTRON_COUNT
    }

    /// Returns the default number of hardware threads.
    fn default_thread_count() -> usize {
        defaults::THREAD_COUNT
    }

    /// Returns the default number of token slots.
    fn default_token_capacity() -> usize {
        defaults::TOKEN_CAPACITY
    }

    /// Validates the configuration and derives the table geometry.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::NonPowerOfTwoHistorySize`] if `history_size` is not a power of two.
    /// * [`ConfigError::HistoryWidthOverflow`] if the derived register width is zero or
    ///   wider than [`MAX_HISTORY_BITS`].
    /// * [`ConfigError::NoPerceptrons`] / [`ConfigError::NoThreads`] for empty tables.
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.history_size, self.perceptron_count)?.check_threads(self.thread_count)
    }
}

impl Default for PredictorConfig {
    /// Creates a default configuration: a 32-entry history path-based
    /// perceptron predictor with ten rows and a single thread.
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            history_size: defaults::HISTORY_SIZE,
            perceptron_count: defaults::PERCEPTRON_COUNT,
            thread_count: defaults::THREAD_COUNT,
            token_capacity: defaults::TOKEN_CAPACITY,
        }
    }
}

/// Validated predictor geometry.
///
/// Every quantity the predictor derives from its configuration lives here so
/// that the components agree on masks and bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Global history length `H`; running sums and weight rows hold `H + 1` entries.
    pub history_size: usize,
    /// Number of perceptron rows.
    pub perceptron_count: usize,
    /// Width of the history registers (`log2(H)`).
    pub history_bits: u32,
    /// Mask applied to every history register update.
    pub history_mask: u32,
    /// Largest representable weight.
    pub max_weight: i32,
    /// Smallest representable weight.
    pub min_weight: i32,
    /// Training threshold.
    pub theta: f64,
}

impl Geometry {
    /// Derives the geometry for a history size and perceptron count.
    ///
    /// # Errors
    ///
    /// See [`PredictorConfig::geometry`].
    pub fn new(history_size: usize, perceptron_count: usize) -> Result<Self, ConfigError> {
        if !history_size.is_power_of_two() {
            return Err(ConfigError::NonPowerOfTwoHistorySize(history_size));
        }

        let history_bits = history_size.trailing_zeros();
        if history_bits == 0 || history_bits > MAX_HISTORY_BITS {
            return Err(ConfigError::HistoryWidthOverflow {
                history_size,
                bits: history_bits,
                max_bits: MAX_HISTORY_BITS,
            });
        }

        let history_mask = (1u32 << history_bits) - 1;
        // The mask must address every table position.
        if (history_size - 1) as u64 > u64::from(history_mask) {
            return Err(ConfigError::HistoryWidthOverflow {
                history_size,
                bits: history_bits,
                max_bits: MAX_HISTORY_BITS,
            });
        }

        if perceptron_count == 0 {
            return Err(ConfigError::NoPerceptrons);
        }

        let max_weight = ((1i64 << (history_bits - 1)) - 1) as i32;
        Ok(Self {
            history_size,
            perceptron_count,
            history_bits,
            history_mask,
            max_weight,
            min_weight: -(max_weight + 1),
            theta: THETA_COEFF.mul_add((history_size + 1) as f64, THETA_BIAS),
        })
    }

    fn check_threads(self, thread_count: usize) -> Result<Self, ConfigError> {
        if thread_count == 0 {
            Err(ConfigError::NoThreads)
        } else {
            Ok(self)
        }
    }
}
