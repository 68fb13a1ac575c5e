//! Path History Tracker.
//!
//! Keeps the most recent branch addresses, newest first. The path decides which
//! perceptron row trains the weight for each history position, so that a
//! position's weight belongs to the branch that produced that history bit.

use std::collections::VecDeque;

use crate::common::Addr;

/// Bounded FIFO of recent branch addresses, shared by all threads.
#[derive(Debug, Clone)]
pub struct PathHistory {
    path: VecDeque<Addr>,
    capacity: usize,
    perceptron_count: u64,
}

impl PathHistory {
    /// Creates an empty path holding up to `capacity` addresses.
    pub fn new(capacity: usize, perceptron_count: usize) -> Self {
        Self {
            path: VecDeque::with_capacity(capacity + 1),
            capacity,
            perceptron_count: perceptron_count as u64,
        }
    }

    /// Pushes `addr` as the most recent branch, evicting the oldest past capacity.
    pub fn record(&mut self, addr: Addr) {
        self.path.push_front(addr);
        self.path.truncate(self.capacity);
    }

    /// Perceptron row an address hashes to.
    #[inline]
    pub const fn row_for(&self, addr: Addr) -> usize {
        (addr % self.perceptron_count) as usize
    }

    /// Row whose weight for history position `j` is trained.
    ///
    /// While the path is shorter than its capacity the index wraps, so the
    /// same address trains several positions. Returns `None` on an empty path.
    #[inline]
    pub fn training_row_for(&self, j: usize) -> Option<usize> {
        if self.path.is_empty() {
            return None;
        }
        Some(self.row_for(self.path[j % self.path.len()]))
    }

    /// Number of addresses currently held.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` before the first branch is recorded.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Iterates the addresses newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Addr> + '_ {
        self.path.iter()
    }
}
