//! Screen model implementation
//!
//! The screen is an append-only list of lines plus a cursor and two mode
//! flags. Unlike a real terminal it has no fixed size: moving the cursor
//! below the last line creates lines, and writing past the end of a line
//! extends it.
//!
//! While the alternate screen buffer is active every positional, erase and
//! write operation is a no-op. Full-screen programs (editors, pagers) redraw
//! through that buffer, and their output cannot be replayed as linear text.

use serde::Serialize;

use super::cursor::Cursor;
use super::line::Line;
use super::render::{LineEnding, TextRenderer};

/// The virtual display a simulation run writes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenBuffer {
    /// Lines, top to bottom. Never shrinks.
    lines: Vec<Line>,
    cursor: Cursor,
    /// Alternate screen buffer (DECSET 1049)
    alternate_buffer: bool,
    /// Bracketed paste mode (DECSET 2004)
    bracketed_paste: bool,
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenBuffer {
    /// Create a screen holding a single empty line
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            cursor: Cursor::new(),
            alternate_buffer: false,
            bracketed_paste: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_alternate_buffer(&self) -> bool {
        self.alternate_buffer
    }

    pub fn is_bracketed_paste(&self) -> bool {
        self.bracketed_paste
    }

    fn current_line_mut(&mut self) -> &mut Line {
        let row = self.cursor.row;
        self.ensure_row(row);
        &mut self.lines[row]
    }

    /// Create lines up to and including `row`
    fn ensure_row(&mut self, row: usize) {
        if row >= self.lines.len() {
            self.lines.resize_with(row + 1, Line::new);
        }
    }

    /// Move down `n` rows, creating lines as needed
    pub fn down(&mut self, n: usize) {
        if self.alternate_buffer {
            return;
        }
        let row = self.cursor.row.saturating_add(n);
        self.ensure_row(row);
        self.cursor.row = row;
    }

    pub fn up(&mut self, n: usize) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.move_up(n);
    }

    pub fn left(&mut self, n: usize) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.move_left(n);
    }

    pub fn right(&mut self, n: usize) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.move_right(n);
    }

    /// Move to a 1-based row and column
    pub fn move_absolute(&mut self, row: usize, col: usize) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.set_row_one_based(row);
        self.cursor.set_col_one_based(col);
        self.ensure_row(self.cursor.row);
    }

    /// Move to a 1-based column on the current row
    pub fn move_column_absolute(&mut self, col: usize) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.set_col_one_based(col);
    }

    pub fn move_to_last_row(&mut self) {
        if self.alternate_buffer {
            return;
        }
        self.cursor.row = self.lines.len() - 1;
    }

    /// Drop the cursor cell and everything right of it (EL 0)
    pub fn erase_to_end_of_line(&mut self) {
        if self.alternate_buffer {
            return;
        }
        let col = self.cursor.col;
        self.current_line_mut().truncate(col);
    }

    /// Blank everything from column 0 through the cursor cell (EL 1)
    pub fn erase_to_start_of_line(&mut self) {
        if self.alternate_buffer {
            return;
        }
        let col = self.cursor.col;
        self.current_line_mut().clear_through(col);
    }

    /// Blank the whole current line (EL 2)
    pub fn erase_line(&mut self) {
        if self.alternate_buffer {
            return;
        }
        self.current_line_mut().clear();
    }

    /// Store `byte` at the cursor and advance one column
    pub fn write_char(&mut self, byte: u8) {
        if self.alternate_buffer {
            return;
        }
        let col = self.cursor.col;
        self.current_line_mut().set(col, byte);
        self.cursor.col = self.cursor.col.saturating_add(1);
    }

    /// The cell just left of the cursor, `None` at column 0 or on a gap
    pub fn previous_cell(&self) -> Option<u8> {
        let col = self.cursor.col.checked_sub(1)?;
        self.lines.get(self.cursor.row)?.get(col)
    }

    pub fn set_bracketed_paste(&mut self, on: bool) {
        self.bracketed_paste = on;
    }

    pub fn set_alternate_buffer(&mut self, on: bool) {
        self.alternate_buffer = on;
    }

    /// Render the screen as text joined with `line_ending`
    pub fn render(&self, line_ending: LineEnding) -> String {
        TextRenderer::new(line_ending).render_string(self)
    }
}
