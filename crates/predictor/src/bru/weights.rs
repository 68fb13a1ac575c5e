//! Saturating Weight Store.
//!
//! A `perceptron_count × (H + 1)` matrix of signed weights bounded by the
//! history width. Column 0 of each row is the bias weight; columns `1..=H`
//! pair with history positions. The table is shared by every hardware thread.

use crate::config::Geometry;

/// Returns `weight` moved one step towards `increase`, saturating at the bounds.
///
/// # Arguments
///
/// * `weight` - Current weight value.
/// * `increase` - Step up when `true`, down when `false`.
/// * `min` / `max` - Inclusive saturation bounds.
#[inline]
pub const fn adjust(weight: i32, increase: bool, min: i32, max: i32) -> i32 {
    if increase {
        if weight < max { weight + 1 } else { max }
    } else if weight > min {
        weight - 1
    } else {
        min
    }
}

/// Perceptron weight table (flattened, row-major).
#[derive(Debug, Clone)]
pub struct WeightTable {
    table: Vec<i32>,
    row_size: usize,
    min: i32,
    max: i32,
}

impl WeightTable {
    /// Creates a zero-initialised table for the given geometry.
    pub fn new(geometry: &Geometry) -> Self {
        let row_size = geometry.history_size + 1;
        Self {
            table: vec![0; geometry.perceptron_count * row_size],
            row_size,
            min: geometry.min_weight,
            max: geometry.max_weight,
        }
    }

    /// Reads the weight at `(row, col)`. Column 0 is the bias.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.table[row * self.row_size + col]
    }

    /// Bias weight of `row`.
    #[inline]
    pub fn bias(&self, row: usize) -> i32 {
        self.table[row * self.row_size]
    }

    /// History weights of `row` (columns `1..=H`, index 0 of the slice is column 1).
    #[inline]
    pub fn history_weights(&self, row: usize) -> &[i32] {
        let base = row * self.row_size;
        &self.table[base + 1..base + self.row_size]
    }

    /// Steps the weight at `(row, col)` towards `increase`, saturating.
    #[inline]
    pub fn train(&mut self, row: usize, col: usize, increase: bool) {
        let idx = row * self.row_size + col;
        self.table[idx] = adjust(self.table[idx], increase, self.min, self.max);
    }
}
