//! Sequence tokens
//!
//! The units the lexer produces. Each token remembers the exact source bytes
//! it was read from so the trace mode can re-emit them untouched.

use std::fmt;

use crate::error::escape_bytes;

/// The escape byte that introduces every sequence
pub const ESC: u8 = 0x1B;

/// Single-byte String Terminator (8-bit ST)
pub const ST_C1: u8 = 0x9C;

/// Layout-affecting C0 controls the simulator interprets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlChar {
    /// LF - Line Feed
    LineFeed,
    /// CR - Carriage Return
    CarriageReturn,
    /// BS - Backspace
    Backspace,
}

impl ControlChar {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'\n' => Some(ControlChar::LineFeed),
            b'\r' => Some(ControlChar::CarriageReturn),
            0x08 => Some(ControlChar::Backspace),
            _ => None,
        }
    }

    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            ControlChar::LineFeed => b"\n",
            ControlChar::CarriageReturn => b"\r",
            ControlChar::Backspace => b"\x08",
        }
    }
}

/// A parsed `ESC [ ... final` control sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSequence {
    /// One of `< = > ?` when it leads the parameter bytes
    pub private_marker: Option<u8>,
    /// Semicolon-separated parameters; `None` marks an empty field
    pub params: Vec<Option<u32>>,
    /// The byte that ended the sequence
    pub final_byte: u8,
    /// Full source bytes including `ESC [`
    raw: Vec<u8>,
}

impl CsiSequence {
    /// Build a sequence from the bytes following `ESC [`, final byte included.
    ///
    /// An empty payload yields a NUL final byte, which nothing dispatches on.
    pub fn from_payload(payload: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(payload.len() + 2);
        raw.extend_from_slice(&[ESC, b'[']);
        raw.extend_from_slice(payload);

        let (final_byte, mut body) = match payload.split_last() {
            Some((&last, body)) => (last, body),
            None => (0, payload),
        };

        let private_marker = match body.first() {
            Some(&marker @ (b'<' | b'=' | b'>' | b'?')) => {
                body = &body[1..];
                Some(marker)
            }
            _ => None,
        };

        Self {
            private_marker,
            params: parse_params(body),
            final_byte,
            raw,
        }
    }

    /// Parameter at `index`, `None` when missing or empty
    pub fn param(&self, index: usize) -> Option<u32> {
        self.params.get(index).copied().flatten()
    }

    /// Parameter at `index`, with `default` standing in for a missing or empty field
    pub fn param_or(&self, index: usize, default: u32) -> u32 {
        self.param(index).unwrap_or(default)
    }

    /// Number of parameter fields, empty ones included
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Bytes between `ESC [` and the end of the sequence
    pub fn payload(&self) -> &[u8] {
        &self.raw[2..]
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// Split on `;` and read the leading digits of each field.
fn parse_params(body: &[u8]) -> Vec<Option<u32>> {
    if body.is_empty() {
        return Vec::new();
    }

    body.split(|&b| b == b';')
        .map(|field| {
            let digits = field.iter().take_while(|b| b.is_ascii_digit());
            let mut value: Option<u32> = None;
            for &digit in digits {
                let acc = value.unwrap_or(0);
                value = Some(acc.saturating_mul(10).saturating_add(u32::from(digit - b'0')));
            }
            value
        })
        .collect()
}

/// One lexical unit of a captured session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceToken {
    /// A byte to be written to the screen
    Literal(u8),

    /// LF, CR or BS
    Control(ControlChar),

    /// Control Sequence Introducer sequence
    Csi(CsiSequence),

    /// Device Control String, never interpreted
    Dcs(Vec<u8>),

    /// Recognised two-byte escape with no effect (`ESC =`, `ESC >`, `ESC ]`, `ESC \`)
    Ignored(Vec<u8>),

    /// Unrecognised escape
    Unknown(Vec<u8>),
}

impl SequenceToken {
    /// Classify a byte read outside any escape sequence
    pub fn from_byte(byte: u8) -> Self {
        match ControlChar::from_byte(byte) {
            Some(control) => SequenceToken::Control(control),
            None => SequenceToken::Literal(byte),
        }
    }

    /// Source bytes this token was read from
    pub fn raw(&self) -> &[u8] {
        match self {
            SequenceToken::Literal(byte) => std::slice::from_ref(byte),
            SequenceToken::Control(control) => control.as_bytes(),
            SequenceToken::Csi(csi) => csi.raw(),
            SequenceToken::Dcs(raw) | SequenceToken::Ignored(raw) | SequenceToken::Unknown(raw) => {
                raw
            }
        }
    }

    /// Short tag used in notices
    pub fn kind(&self) -> &'static str {
        match self {
            SequenceToken::Literal(_) => "literal",
            SequenceToken::Control(_) => "control",
            SequenceToken::Csi(_) => "CSI",
            SequenceToken::Dcs(_) => "DCS",
            SequenceToken::Ignored(_) => "ignored",
            SequenceToken::Unknown(_) => "unknown",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, SequenceToken::Literal(_))
    }

    pub fn is_csi(&self) -> bool {
        matches!(self, SequenceToken::Csi(_))
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind(), escape_bytes(self.raw()))
    }
}
