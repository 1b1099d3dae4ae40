//! Sequence lexer
//!
//! Splits a captured byte stream into [`SequenceToken`]s, one per call.
//!
//! Recognised forms:
//! - plain bytes (LF, CR and BS are classified as controls)
//! - `ESC [ ... final` CSI sequences
//! - `ESC P + ... ST` and `ESC P $ ... ST` DCS strings
//! - `ESC =`, `ESC >`, `ESC ]`, `ESC \` which are dropped
//!
//! `ESC ]` (OSC) is consumed as two bytes only; its payload is lexed as
//! ordinary bytes afterwards.

use super::cursor::ByteCursor;
use super::token::{CsiSequence, SequenceToken, ESC, ST_C1};
use crate::diagnostics::DiagnosticSink;
use crate::error::{escape_bytes, Error, Result};

/// Bytes that end a CSI sequence
fn is_csi_final(byte: u8) -> bool {
    byte == b'@'
        || byte.is_ascii_alphabetic()
        || matches!(
            byte,
            b'[' | b']' | b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~'
        )
}

/// Pull-based tokenizer over a captured session
#[derive(Debug, Clone)]
pub struct SequenceLexer<'a> {
    input: ByteCursor<'a>,
}

impl<'a> SequenceLexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input: ByteCursor::new(input),
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.input.position()
    }

    /// Read the next token, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnterminatedSequence`] when the input ends inside a
    /// CSI or DCS sequence.
    pub fn next_token<S: DiagnosticSink>(&mut self, sink: &mut S) -> Result<Option<SequenceToken>> {
        loop {
            let start = self.input.position();
            let Some(byte) = self.input.next_byte() else {
                return Ok(None);
            };

            if byte != ESC {
                return Ok(Some(SequenceToken::from_byte(byte)));
            }

            if let Some(token) = self.read_escape(start, sink)? {
                return Ok(Some(token));
            }
            // Unsupported DCS: nothing to emit, resume with the next byte.
        }
    }

    /// Dispatch on the byte after ESC
    fn read_escape<S: DiagnosticSink>(
        &mut self,
        start: usize,
        sink: &mut S,
    ) -> Result<Option<SequenceToken>> {
        let Some(introducer) = self.input.next_byte() else {
            // Lone ESC at the very end
            return Ok(Some(SequenceToken::Unknown(vec![ESC])));
        };

        match introducer {
            b'[' => self.read_csi(start).map(Some),
            b'P' => self.read_dcs(start, sink),
            // DECKPAM, DECKPNM, OSC, ST
            b'=' | b'>' | b']' | b'\\' => Ok(Some(SequenceToken::Ignored(
                self.input.consumed_since(start).to_vec(),
            ))),
            _ => Ok(Some(SequenceToken::Unknown(
                self.input.consumed_since(start).to_vec(),
            ))),
        }
    }

    fn read_csi(&mut self, start: usize) -> Result<SequenceToken> {
        let payload_start = self.input.position();
        loop {
            match self.input.next_byte() {
                Some(byte) if is_csi_final(byte) => break,
                Some(_) => {}
                None => {
                    return Err(Error::UnterminatedSequence {
                        kind: "CSI",
                        offset: start,
                    })
                }
            }
        }

        let payload = self.input.consumed_since(payload_start);
        Ok(SequenceToken::Csi(CsiSequence::from_payload(payload)))
    }

    fn read_dcs<S: DiagnosticSink>(
        &mut self,
        start: usize,
        sink: &mut S,
    ) -> Result<Option<SequenceToken>> {
        let unterminated = || Error::UnterminatedSequence {
            kind: "DCS",
            offset: start,
        };

        match self.input.next_byte() {
            // DCS + p Pt ST (XTSETTCAP), DCS $ q Pt ST (DECRQSS)
            Some(b'+' | b'$') => {}
            Some(_) => {
                sink.report(&format!(
                    "unsupported DCS sequence ({})",
                    escape_bytes(self.input.consumed_since(start))
                ));
                return Ok(None);
            }
            None => return Err(unterminated()),
        }

        loop {
            let previous = self.input.last();
            match self.input.next_byte() {
                Some(b'\\') if previous == Some(ESC) => break,
                Some(ST_C1) => break,
                Some(_) => {}
                None => return Err(unterminated()),
            }
        }

        Ok(Some(SequenceToken::Dcs(
            self.input.consumed_since(start).to_vec(),
        )))
    }
}
