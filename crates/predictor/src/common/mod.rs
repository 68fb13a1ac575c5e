//! Common types shared by every predictor component.
//!
//! This module provides:
//! 1. **Error Handling:** Configuration errors, token contract violations and the
//!    umbrella [`PredictorError`].
//! 2. **Identifiers:** Plain aliases for thread ids and branch addresses.

/// Error types for configuration and runtime operations.
pub mod error;

pub use error::{ConfigError, PredictorError, Result, TokenError};

/// Hardware thread identifier.
pub type ThreadId = usize;

/// Branch instruction address.
pub type Addr = u64;
