//! Prediction token arena.
//!
//! Every prediction hands the caller a [`PredictionToken`]: a move-only
//! handle into a preallocated slot arena. The slot holds the state needed to
//! train or roll back once the branch resolves. `resolve` and `squash` take the
//! token by value, so a second hand-back does not compile. Releasing a slot
//! bumps its generation, which still rejects handles rebuilt with
//! [`PredictionToken::from_raw`] after their slot was recycled.

use tracing::warn;

use crate::common::{ThreadId, TokenError};

/// Caller-owned handle for one in-flight branch prediction.
///
/// Travels with the instruction through the pipeline and must be consumed by
/// exactly one `resolve` or `squash`. Dropping a token without handing it back
/// leaks its slot.
///
/// A token cannot be handed back twice:
///
/// ```compile_fail
/// use neuropath_core::{DirectionPredictor, NeuroPathPredictor, PredictorConfig};
///
/// let mut bp = NeuroPathPredictor::new(&PredictorConfig::default()).unwrap();
/// let p = bp.predict(0, 0x100).unwrap();
/// bp.resolve(0, 0x100, true, p.token, false).unwrap();
/// bp.squash(0, p.token).unwrap();
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a prediction token must be handed back to `resolve` or `squash`"]
pub struct PredictionToken {
    slot: u32,
    generation: u32,
}

impl PredictionToken {
    /// Arena slot index.
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the token was issued.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Builds a handle from raw parts, as returned by [`slot`](Self::slot) and
    /// [`generation`](Self::generation). For callers that serialize in-flight
    /// state; the arena validates it on use.
    pub const fn from_raw(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }
}

/// State captured when a prediction is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    /// Thread that made the prediction.
    pub tid: ThreadId,
    /// Speculative global history at prediction time.
    pub history: u32,
    /// Predicted direction.
    pub predicted_taken: bool,
    /// Token came from an unconditional branch.
    pub unconditional: bool,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry: Option<TokenEntry>,
}

/// Slot arena backing prediction tokens.
#[derive(Debug, Clone)]
pub struct TokenArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl TokenArena {
    /// Creates an arena with `capacity` preallocated slots.
    pub fn new(capacity: usize) -> Self {
        let slots = vec![Slot::default(); capacity];
        // Lowest slots are handed out first.
        let free = (0..capacity as u32).rev().collect();
        Self { slots, free }
    }

    /// Stores `entry` and returns the handle for it.
    ///
    /// When every slot is in flight the arena grows by one slot.
    pub fn allocate(&mut self, entry: TokenEntry) -> PredictionToken {
        let slot = if let Some(slot) = self.free.pop() {
            slot
        } else {
            let slot = self.slots.len() as u32;
            warn!(slots = slot + 1, "prediction token arena exhausted; growing");
            self.slots.push(Slot::default());
            slot
        };

        let s = &mut self.slots[slot as usize];
        s.entry = Some(entry);
        PredictionToken {
            slot,
            generation: s.generation,
        }
    }

    /// Looks up the live entry behind `token`.
    ///
    /// # Errors
    ///
    /// [`TokenError::Unknown`] if the slot does not exist, [`TokenError::Released`]
    /// if the token was already consumed.
    pub fn get(&self, token: &PredictionToken) -> Result<&TokenEntry, TokenError> {
        let slot = self
            .slots
            .get(token.slot as usize)
            .ok_or(TokenError::Unknown { slot: token.slot })?;
        match &slot.entry {
            Some(entry) if slot.generation == token.generation => Ok(entry),
            _ => Err(TokenError::Released { slot: token.slot }),
        }
    }

    /// Consumes `token` on behalf of thread `tid`, returning its entry.
    ///
    /// Nothing is released if validation fails; the slot of a live token
    /// handed back on the wrong thread stays reserved.
    ///
    /// # Errors
    ///
    /// As [`TokenArena::get`], plus [`TokenError::ThreadMismatch`] if the token
    /// belongs to another thread.
    pub fn release(&mut self, token: PredictionToken, tid: ThreadId) -> Result<TokenEntry, TokenError> {
        let entry = *self.get(&token)?;
        if entry.tid != tid {
            return Err(TokenError::ThreadMismatch { owner: entry.tid, tid });
        }

        let slot = &mut self.slots[token.slot as usize];
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(token.slot);
        Ok(entry)
    }

    /// Number of tokens currently owned by the caller.
    pub fn in_flight(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
