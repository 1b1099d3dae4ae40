//! Cursor position
//!
//! Rows and columns are 0-indexed. Neither axis has an upper bound; the
//! screen grows to meet the cursor.

use serde::{Deserialize, Serialize};

/// Cursor position on the virtual screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed)
    pub col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move up, stopping at row 0
    pub fn move_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
    }

    /// Move left, stopping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
    }

    pub fn move_right(&mut self, n: usize) {
        self.col = self.col.saturating_add(n);
    }

    /// Set the column from a 1-based position; 0 behaves like 1
    pub fn set_col_one_based(&mut self, col: usize) {
        self.col = col.saturating_sub(1);
    }

    /// Set the row from a 1-based position; 0 behaves like 1
    pub fn set_row_one_based(&mut self, row: usize) {
        self.row = row.saturating_sub(1);
    }
}
