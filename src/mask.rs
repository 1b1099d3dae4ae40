//! Trace mode
//!
//! Re-emits the token stream without simulating a screen. Printable ASCII
//! literals pass through, every other literal byte becomes a placeholder,
//! and controls and escape sequences are copied as their source bytes.
//! The result shows exactly where the lexer split the input.

use crate::diagnostics::DiagnosticSink;
use crate::error::{escape_bytes, Result};
use crate::parser::{SequenceLexer, SequenceToken};

/// Placeholder used when none is configured
pub const DEFAULT_PLACEHOLDER: u8 = b'x';

/// Lexes a capture and writes the trace of its tokens
#[derive(Debug, Clone, Copy)]
pub struct Masker {
    placeholder: u8,
}

impl Default for Masker {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl Masker {
    pub fn new(placeholder: u8) -> Self {
        Self { placeholder }
    }

    pub fn placeholder(&self) -> u8 {
        self.placeholder
    }

    /// Trace the whole input.
    ///
    /// # Errors
    ///
    /// Propagates the lexer's fatal errors for unterminated sequences.
    pub fn mask<S: DiagnosticSink>(&self, input: &[u8], sink: &mut S) -> Result<Vec<u8>> {
        let mut lexer = SequenceLexer::new(input);
        let mut out = Vec::with_capacity(input.len());

        while let Some(token) = lexer.next_token(sink)? {
            match &token {
                SequenceToken::Literal(byte) if is_printable(*byte) => out.push(*byte),
                SequenceToken::Literal(_) => out.push(self.placeholder),
                SequenceToken::Unknown(raw) => {
                    sink.report(&format!("unsupported escape sequence ({})", escape_bytes(raw)));
                    out.extend_from_slice(raw);
                }
                _ => out.extend_from_slice(token.raw()),
            }
        }

        Ok(out)
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::error::Error;

    fn mask(input: &[u8]) -> Vec<u8> {
        Masker::default().mask(input, &mut CollectingSink::new()).unwrap()
    }

    #[test]
    fn test_printable_passes_through() {
        assert_eq!(mask(b"hello, world"), b"hello, world");
    }

    #[test]
    fn test_non_printable_literals_masked() {
        assert_eq!(mask(b"a\tb\x07\xe3\x81\x82"), b"axbxxxx");
    }

    #[test]
    fn test_controls_and_sequences_kept() {
        let input = b"\x1b[1;32mok\x1b[0m\r\n\x1b=\x1bP$qm\x1b\\";
        assert_eq!(mask(input), input.to_vec());
    }

    #[test]
    fn test_custom_placeholder() {
        let masker = Masker::new(b'#');
        assert_eq!(masker.placeholder(), b'#');
        assert_eq!(Masker::default().placeholder(), DEFAULT_PLACEHOLDER);
        let out = masker.mask(b"\x00a", &mut CollectingSink::new()).unwrap();
        assert_eq!(out, b"#a");
    }

    #[test]
    fn test_unknown_escape_reported() {
        let mut sink = CollectingSink::new();
        let out = Masker::default().mask(b"\x1b7", &mut sink).unwrap();
        assert_eq!(out, b"\x1b7");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_unterminated_sequence_is_fatal() {
        let result = Masker::default().mask(b"\x1b[12", &mut CollectingSink::new());
        assert!(matches!(result, Err(Error::UnterminatedSequence { .. })));
    }
}
