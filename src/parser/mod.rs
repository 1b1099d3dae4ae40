//! Escape sequence lexer
//!
//! Turns raw captured bytes into a lazy stream of sequence tokens.
//! The lexer reads strictly forward, one token per call, and never
//! interprets what a sequence means; that is the simulator's job.

mod cursor;
mod lexer;
mod token;

pub use cursor::ByteCursor;
pub use lexer::SequenceLexer;
pub use token::{ControlChar, CsiSequence, SequenceToken, ESC, ST_C1};
