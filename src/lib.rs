//! script-cat library
//!
//! Recovers the text a terminal session capture would have left on screen.
//! The capture is lexed into escape-sequence tokens, replayed onto a
//! growable virtual screen, and the final screen is rendered as plain text.
//!
//! - `parser`: byte-level lexer for control characters, CSI and DCS sequences
//! - `core`: screen buffer, cursor, lines and transcript rendering
//! - `simulator`: applies tokens to the screen
//! - `mask`: token trace with literal text masked
//! - `encoding`: optional transcoding of the transcript to UTF-8
//! - `config`: CLI arguments and layered settings

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod mask;
pub mod parser;
pub mod simulator;

pub use crate::config::{CliArgs, Config, ConfigError, OutputMode};
pub use crate::core::{LineEnding, ScreenBuffer, TextRenderer};
pub use crate::diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
pub use crate::encoding::SourceEncoding;
pub use crate::error::{Error, Result};
pub use crate::mask::Masker;
pub use crate::simulator::Simulator;

/// Replay a capture and return the final screen
///
/// # Errors
///
/// Fails on an unterminated sequence or a malformed cursor-position request.
pub fn simulate<S: DiagnosticSink>(input: &[u8], sink: S) -> Result<ScreenBuffer> {
    Simulator::new(input, sink).run()
}

/// Replay a capture and render its transcript, ending with one line separator
///
/// # Errors
///
/// See [`simulate`].
pub fn transcript<S: DiagnosticSink>(
    input: &[u8],
    line_ending: LineEnding,
    sink: S,
) -> Result<Vec<u8>> {
    let screen = simulate(input, sink)?;
    Ok(TextRenderer::new(line_ending).transcript(&screen))
}

/// Produce the output `config.mode` asks for
///
/// Transcripts are transcoded to UTF-8 when `config.encoding` is set.
///
/// # Errors
///
/// See [`simulate`]. Dump mode can also fail to serialize.
pub fn process<S: DiagnosticSink>(input: &[u8], config: &Config, mut sink: S) -> Result<Vec<u8>> {
    match config.mode {
        OutputMode::Transcript => {
            let screen = simulate_limited(input, config, sink)?;
            let text = TextRenderer::new(config.line_ending).transcript(&screen);
            Ok(match config.encoding {
                Some(encoding) => encoding.transcode(&text),
                None => text,
            })
        }
        OutputMode::Mask => Masker::new(config.placeholder_byte()).mask(input, &mut sink),
        OutputMode::Dump => {
            let screen = simulate_limited(input, config, sink)?;
            let mut out = serde_json::to_vec_pretty(&screen)?;
            out.push(b'\n');
            Ok(out)
        }
    }
}

fn simulate_limited<S: DiagnosticSink>(input: &[u8], config: &Config, sink: S) -> Result<ScreenBuffer> {
    Simulator::new(input, sink)
        .with_count_limit(config.max_count)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_round() {
        let out = transcript(b"$ ls\r\nfoo  bar\r\n$ ", LineEnding::Lf, CollectingSink::new());
        assert_eq!(out.unwrap(), b"$ ls\nfoo  bar\n$\n");
    }

    #[test]
    fn test_process_modes() {
        let mut config = Config::default();
        let input = b"\x1b[31mred\x1b[0m\xff";

        assert_eq!(process(input, &config, CollectingSink::new()).unwrap(), b"red\xff\n");

        config.mode = OutputMode::Mask;
        assert_eq!(
            process(input, &config, CollectingSink::new()).unwrap(),
            b"\x1b[31mred\x1b[0mx"
        );

        config.mode = OutputMode::Dump;
        let dump = process(b"hi", &config, CollectingSink::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&dump).unwrap();
        assert_eq!(value["cursor"]["col"], 2);
    }

    #[test]
    fn test_process_transcodes_transcript() {
        let mut config = Config {
            encoding: Some(SourceEncoding::ShiftJis),
            ..Config::default()
        };
        let input = b"\x1b[1m\x82\xa0\x1b[0m\r\n";
        assert_eq!(
            process(input, &config, CollectingSink::new()).unwrap(),
            "\u{3042}\n".as_bytes()
        );

        // Trace output stays byte-for-byte
        config.mode = OutputMode::Mask;
        assert_eq!(
            process(input, &config, CollectingSink::new()).unwrap(),
            b"\x1b[1mxx\x1b[0m\r\n"
        );
    }

    #[test]
    fn test_process_applies_count_limit() {
        let config = Config {
            max_count: Some(2),
            ..Config::default()
        };
        let mut sink = CollectingSink::new();
        let out = process(b"a\x1b[9Cb", &config, &mut sink).unwrap();
        assert_eq!(out, b"a  b\n");
        assert_eq!(sink.len(), 1);
    }
}
