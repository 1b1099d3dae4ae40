//! Screen line representation
//!
//! A line is a sparse run of byte cells. Cells that were never written, or
//! were erased, are gaps and render as spaces.

use serde::{Deserialize, Serialize};

/// A row of cells on the virtual screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line {
    cells: Vec<Option<u8>>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells held, gaps included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Byte at `col`, `None` for a gap or past the end
    pub fn get(&self, col: usize) -> Option<u8> {
        self.cells.get(col).copied().flatten()
    }

    /// Store a byte at `col`, padding with gaps as needed
    pub fn set(&mut self, col: usize, byte: u8) {
        if col >= self.cells.len() {
            self.cells.resize(col + 1, None);
        }
        self.cells[col] = Some(byte);
    }

    /// Drop every cell from `col` onwards
    pub fn truncate(&mut self, col: usize) {
        self.cells.truncate(col);
    }

    /// Turn cells `0..=col` into gaps
    pub fn clear_through(&mut self, col: usize) {
        let end = col.saturating_add(1).min(self.cells.len());
        for cell in &mut self.cells[..end] {
            *cell = None;
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cell bytes with gaps as spaces and trailing whitespace removed
    pub fn to_trimmed_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.cells.iter().map(|c| c.unwrap_or(b' ')).collect();
        while bytes.last().is_some_and(|&b| is_blank(b)) {
            bytes.pop();
        }
        bytes
    }
}

/// Whitespace as far as line trimming is concerned
pub(crate) fn is_blank(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B || byte == 0x00
}
