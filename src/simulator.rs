//! Screen simulator
//!
//! Pulls tokens from the lexer one at a time and applies each one to a
//! [`ScreenBuffer`]. This is the integration point between lexing and the
//! screen model.
//!
//! Several sequences are deliberately approximated. A capture is replayed
//! as one long scrolling page, so anything that would reposition the
//! cursor on a fixed-size screen is folded onto the last line instead:
//! - `CSI J` (erase below) moves to the last line
//! - `CSI 1/2/3 J` (erase above / screen / scrollback) advances 10 lines
//! - `CSI H` without parameters advances one line
//! - `CSI row;col H` keeps only the column, on the last line
//! - `CSI M` (delete lines) is skipped so no text is lost

use crate::core::ScreenBuffer;
use crate::diagnostics::DiagnosticSink;
use crate::error::{escape_bytes, Error, Result};
use crate::parser::{ControlChar, CsiSequence, SequenceLexer, SequenceToken};

/// Lines skipped for an erase-above/screen/scrollback request
const ERASE_SCREEN_ADVANCE: usize = 10;

/// DEC private modes
const MODE_BRACKETED_PASTE: u32 = 2004;
const MODE_ALTERNATE_BUFFER: u32 = 1049;
/// DECCKM, DECOM, DECAWM, cursor blink, DECTCEM
const MODES_WITHOUT_EFFECT: [u32; 5] = [1, 6, 7, 12, 25];

/// Replays one capture onto one screen
#[derive(Debug)]
pub struct Simulator<'a, S: DiagnosticSink> {
    lexer: SequenceLexer<'a>,
    screen: ScreenBuffer,
    sink: S,
    count_limit: Option<u32>,
}

impl<'a, S: DiagnosticSink> Simulator<'a, S> {
    pub fn new(input: &'a [u8], sink: S) -> Self {
        Self {
            lexer: SequenceLexer::new(input),
            screen: ScreenBuffer::new(),
            sink,
            count_limit: None,
        }
    }

    /// Clamp movement counts and column positions to `limit`.
    ///
    /// Unbounded by default, so `CSI 20000000 B` creates that many lines.
    /// Each clamped value is reported to the sink.
    pub fn with_count_limit(mut self, limit: Option<u32>) -> Self {
        self.count_limit = limit;
        self
    }

    /// The screen as it stands after the tokens applied so far
    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply the next token. Returns `false` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates lexer errors and [`Error::CursorPositionArity`].
    pub fn step(&mut self) -> Result<bool> {
        match self.lexer.next_token(&mut self.sink)? {
            Some(token) => {
                dispatch(&mut self.screen, &mut self.sink, &token, self.count_limit)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Process the whole input and hand back the finished screen.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal condition; see [`step`](Self::step).
    pub fn run(mut self) -> Result<ScreenBuffer> {
        self.run_to_end()?;
        Ok(self.screen)
    }

    /// Process the whole input, keeping the sink.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal condition; see [`step`](Self::step).
    pub fn run_to_end(&mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }

    pub fn into_parts(self) -> (ScreenBuffer, S) {
        (self.screen, self.sink)
    }
}

/// Apply a single token to the screen
///
/// # Errors
///
/// Returns [`Error::CursorPositionArity`] for an `H` sequence with a
/// parameter count other than 0 or 2.
pub fn apply_token<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    token: &SequenceToken,
) -> Result<()> {
    dispatch(screen, sink, token, None)
}

fn dispatch<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    token: &SequenceToken,
    limit: Option<u32>,
) -> Result<()> {
    match token {
        SequenceToken::Literal(byte) => screen.write_char(*byte),
        SequenceToken::Control(control) => execute_control(screen, *control),
        SequenceToken::Csi(csi) => execute_csi(screen, sink, csi, limit)?,
        SequenceToken::Dcs(_) | SequenceToken::Ignored(_) => {
            tracing::debug!("skipping {}", token);
        }
        SequenceToken::Unknown(raw) => {
            sink.report(&format!("unsupported escape sequence ({})", escape_bytes(raw)));
        }
    }
    Ok(())
}

fn execute_control(screen: &mut ScreenBuffer, control: ControlChar) {
    match control {
        ControlChar::LineFeed => screen.down(1),
        ControlChar::CarriageReturn => {
            // A line that wrapped on a trailing space is followed directly by
            // CR; treat that as the newline the wrap implied.
            if screen.previous_cell() == Some(b' ') {
                screen.down(1);
            }
            screen.move_column_absolute(1);
        }
        ControlChar::Backspace => screen.left(1),
    }
}

/// Parameter `index` as a count (absent means 1), clamped to `limit`
fn count<S: DiagnosticSink>(
    sink: &mut S,
    csi: &CsiSequence,
    index: usize,
    limit: Option<u32>,
) -> usize {
    let value = csi.param_or(index, 1);
    match limit {
        Some(max) if value > max => {
            sink.report(&format!(
                "count {} clamped to {} ({})",
                value,
                max,
                escape_bytes(csi.raw())
            ));
            max as usize
        }
        _ => value as usize,
    }
}

fn execute_csi<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    csi: &CsiSequence,
    limit: Option<u32>,
) -> Result<()> {
    match csi.final_byte {
        b'K' => erase_in_line(screen, sink, csi),
        b'J' => erase_in_display(screen, sink, csi),
        b'H' => cursor_position(screen, sink, csi, limit)?,
        // IL - Insert Lines
        b'L' => screen.down(count(sink, csi, 0, limit)),
        // DL - Delete Lines, SGR
        b'M' | b'm' => {}
        // CUU, CUD, CUF, CUB
        b'A' => screen.up(count(sink, csi, 0, limit)),
        b'B' => screen.down(count(sink, csi, 0, limit)),
        b'C' => screen.right(count(sink, csi, 0, limit)),
        b'D' => screen.left(count(sink, csi, 0, limit)),
        b'h' => set_private_mode(screen, sink, csi, true),
        b'l' => set_private_mode(screen, sink, csi, false),
        // DECRQM
        b'p' if csi.payload().contains(&b'$') => {}
        // DA, DECSTBM, DSR
        b'c' | b'r' | b'n' | b'=' | b'>' => {}
        _ => report_unsupported(sink, csi),
    }
    Ok(())
}

fn report_unsupported<S: DiagnosticSink>(sink: &mut S, csi: &CsiSequence) {
    sink.report(&format!("unsupported CSI sequence ({})", escape_bytes(csi.raw())));
}

/// EL - Erase in Line
fn erase_in_line<S: DiagnosticSink>(screen: &mut ScreenBuffer, sink: &mut S, csi: &CsiSequence) {
    match csi.param_or(0, 0) {
        0 => screen.erase_to_end_of_line(),
        1 => screen.erase_to_start_of_line(),
        2 => screen.erase_line(),
        _ => report_unsupported(sink, csi),
    }
}

/// ED - Erase in Display
fn erase_in_display<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    csi: &CsiSequence,
) {
    match csi.param_or(0, 0) {
        0 => screen.move_to_last_row(),
        1..=3 => screen.down(ERASE_SCREEN_ADVANCE),
        _ => report_unsupported(sink, csi),
    }
}

/// CUP - Cursor Position
fn cursor_position<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    csi: &CsiSequence,
    limit: Option<u32>,
) -> Result<()> {
    match csi.param_count() {
        // Emitted when the screen is cleared
        0 => screen.down(1),
        2 => {
            screen.move_to_last_row();
            screen.move_column_absolute(count(sink, csi, 1, limit));
        }
        n => {
            return Err(Error::CursorPositionArity {
                count: n,
                sequence: escape_bytes(csi.raw()),
            })
        }
    }
    Ok(())
}

/// DECSET / DECRST
fn set_private_mode<S: DiagnosticSink>(
    screen: &mut ScreenBuffer,
    sink: &mut S,
    csi: &CsiSequence,
    on: bool,
) {
    if csi.private_marker == Some(b'?') {
        match csi.param(0) {
            Some(MODE_BRACKETED_PASTE) => {
                screen.set_bracketed_paste(on);
                return;
            }
            Some(MODE_ALTERNATE_BUFFER) => {
                screen.set_alternate_buffer(on);
                return;
            }
            Some(mode) if MODES_WITHOUT_EFFECT.contains(&mode) => return,
            _ => {}
        }
    }
    report_unsupported(sink, csi);
}
