//! Transcript re-encoding
//!
//! The screen stores bytes exactly as the capture contained them. When the
//! session ran in a legacy locale the transcript can be decoded from that
//! encoding and written out as UTF-8.

use encoding_rs::{Encoding, EUC_JP, SHIFT_JIS, UTF_8};
use serde::{Deserialize, Serialize};

/// Encoding the captured session produced its text in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEncoding {
    #[serde(rename = "sjis")]
    ShiftJis,
    #[serde(rename = "eucjp")]
    EucJp,
    #[serde(rename = "utf8")]
    Utf8,
}

impl SourceEncoding {
    /// Parse a name as accepted by `SCRIPTCAT_ENCODING`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "sjis" | "shiftjis" => Some(SourceEncoding::ShiftJis),
            "eucjp" => Some(SourceEncoding::EucJp),
            "utf8" => Some(SourceEncoding::Utf8),
            _ => None,
        }
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            SourceEncoding::ShiftJis => SHIFT_JIS,
            SourceEncoding::EucJp => EUC_JP,
            SourceEncoding::Utf8 => UTF_8,
        }
    }

    /// Decode `bytes` and return them as UTF-8. Malformed sequences become
    /// U+FFFD and are logged.
    pub fn transcode(self, bytes: &[u8]) -> Vec<u8> {
        let (text, actual, had_errors) = self.encoding().decode(bytes);
        if had_errors {
            tracing::warn!("transcript contains bytes that are not valid {}", actual.name());
        }
        text.into_owned().into_bytes()
    }
}
