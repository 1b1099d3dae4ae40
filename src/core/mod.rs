//! Screen Core Module
//!
//! The virtual display a capture is replayed onto, and the renderer that
//! turns it back into text. This module contains:
//! - Cursor position
//! - Lines of sparse byte cells
//! - The growable screen buffer with its mode flags
//! - Transcript rendering
//!
//! Given the same sequence of operations the screen always ends in the same
//! state, and rendering it never mutates it.

mod cursor;
mod line;
mod render;
mod screen;

pub use cursor::Cursor;
pub use line::Line;
pub use render::{LineEnding, TextRenderer};
pub use screen::ScreenBuffer;
