//! Global History Registers.
//!
//! Each hardware thread owns a committed register `G`, shifted with resolved
//! outcomes, and a speculative register `SG`, shifted with predicted outcomes.
//! Both are masked to the history width after every update.

/// Shifts `bit` into `reg`, keeping the low bits selected by `mask`.
#[inline]
pub const fn advance(reg: u32, bit: bool, mask: u32) -> u32 {
    ((reg << 1) | bit as u32) & mask
}

/// Forces the most recent outcome in `reg` to not-taken.
#[inline]
pub const fn clear_low_bit(reg: u32, mask: u32) -> u32 {
    reg & !1 & mask
}

/// Committed and speculative history for one thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadHistory {
    /// Committed global history (resolved outcomes only).
    pub committed: u32,
    /// Speculative global history (includes in-flight predictions).
    pub speculative: u32,
}

/// Per-thread history register file.
#[derive(Debug, Clone)]
pub struct HistoryRegisters {
    threads: Vec<ThreadHistory>,
    mask: u32,
}

impl HistoryRegisters {
    /// Creates zeroed registers for `thread_count` threads.
    pub fn new(thread_count: usize, mask: u32) -> Self {
        Self {
            threads: vec![ThreadHistory::default(); thread_count],
            mask,
        }
    }

    /// Number of threads.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Returns `true` if no threads are configured.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Registers of thread `tid`, if it exists.
    pub fn get(&self, tid: usize) -> Option<&ThreadHistory> {
        self.threads.get(tid)
    }

    /// Speculative register `SG[tid]`.
    #[inline]
    pub fn speculative(&self, tid: usize) -> u32 {
        self.threads[tid].speculative
    }

    /// Shifts a predicted outcome into `SG[tid]`.
    pub fn speculate(&mut self, tid: usize, taken: bool) {
        let th = &mut self.threads[tid];
        th.speculative = advance(th.speculative, taken, self.mask);
    }

    /// Shifts a resolved outcome into `G[tid]`.
    pub fn commit(&mut self, tid: usize, taken: bool) {
        let th = &mut self.threads[tid];
        th.committed = advance(th.committed, taken, self.mask);
    }

    /// Treats the last committed branch of `tid` as not-taken.
    pub fn clear_committed_low_bit(&mut self, tid: usize) {
        let th = &mut self.threads[tid];
        th.committed = clear_low_bit(th.committed, self.mask);
    }

    /// Discards speculative history of `tid`: `SG[tid] = G[tid]`.
    pub fn restore(&mut self, tid: usize) {
        let th = &mut self.threads[tid];
        th.speculative = th.committed;
    }
}
