//! Speculative branch direction predictor core.
//!
//! This crate implements the direction predictor of a pipelined CPU simulator with the following:
//! 1. **Predictors:** A path-based perceptron predictor and an always-taken static predictor
//!    behind one operation set ([`DirectionPredictor`]).
//! 2. **Speculation:** Per-thread speculative and committed history, running partial sums,
//!    and caller-owned prediction tokens for resolution and squash.
//! 3. **Configuration:** Deserializable table geometry with validation.
//! 4. **Statistics:** Lookup, misprediction, training, and rollback counters.
//!
//! The core is synchronous and deterministic: it has no I/O, no clocks, and no
//! background work. The surrounding pipeline decides when to call it.

/// Direction predictors and their components.
pub mod bru;
/// Common types (errors, identifiers).
pub mod common;
/// Predictor configuration and derived geometry.
pub mod config;
/// Predictor statistics collection and reporting.
pub mod stats;

/// Operation set shared by every predictor variant.
pub use crate::bru::{DirectionPredictor, Prediction, PredictionToken, PredictorWrapper};
/// Path-based perceptron predictor; construct with `NeuroPathPredictor::new`.
pub use crate::bru::neuropath::NeuroPathPredictor;
/// Error types returned by construction and runtime operations.
pub use crate::common::{ConfigError, PredictorError, TokenError};
/// Root configuration type; use `PredictorConfig::default()` or deserialize from JSON.
pub use crate::config::PredictorConfig;
