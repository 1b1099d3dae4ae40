//! Property-based invariant tests for the lexer and simulator.
//!
//! 1. Token bytes tile the input: concatenating every token's raw bytes
//!    reproduces the consumed input exactly (unsupported DCS aside).
//! 2. Lexing never panics and fails only with UnterminatedSequence.
//! 3. Plain text without ESC lexes to one token per byte.
//! 4. Alternate buffer isolation: anything sent while it is active leaves
//!    the transcript unchanged.
//! 5. Rendering is repeatable and lines never end in whitespace.
//! 6. Mask output keeps the input length when no DCS is reported.

use proptest::prelude::*;
use scriptcat::mask::Masker;
use scriptcat::parser::{SequenceLexer, SequenceToken};
use scriptcat::{transcript, CollectingSink, Error, LineEnding, Simulator, TextRenderer};

// ── Strategies ──────────────────────────────────────────────────────────

/// Complete sequences, controls and text; never triggers a fatal error
fn safe_capture() -> impl Strategy<Value = Vec<u8>> {
    let fragment = prop_oneof![
        4 => proptest::collection::vec(0x20u8..0x7F, 1..8),
        1 => Just(b"\r\n".to_vec()),
        1 => Just(b"\x08".to_vec()),
        1 => (0u32..40, prop::sample::select(b"ABCDKJLm".to_vec()))
            .prop_map(|(n, f)| format!("\x1b[{}{}", n, char::from(f)).into_bytes()),
        1 => (1u32..30, 1u32..90).prop_map(|(r, c)| format!("\x1b[{};{}H", r, c).into_bytes()),
        1 => prop::sample::select(vec![
            b"\x1b[?2004h".to_vec(),
            b"\x1b[?25l".to_vec(),
            b"\x1b=".to_vec(),
            b"\x1b]".to_vec(),
            b"\x1bP+q544e\x1b\\".to_vec(),
            b"\x1b7".to_vec(),
        ]),
    ];
    proptest::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

fn arbitrary_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn token_bytes_tile_the_input(input in safe_capture()) {
        let mut lexer = SequenceLexer::new(&input);
        let mut sink = CollectingSink::new();
        let mut rebuilt = Vec::new();
        while let Some(token) = lexer.next_token(&mut sink).unwrap() {
            rebuilt.extend_from_slice(token.raw());
        }
        prop_assert!(sink.is_empty());
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn lexing_arbitrary_bytes_never_panics(input in arbitrary_bytes()) {
        let mut lexer = SequenceLexer::new(&input);
        let mut sink = CollectingSink::new();
        loop {
            match lexer.next_token(&mut sink) {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    let is_unterminated = matches!(e, Error::UnterminatedSequence { .. });
                    prop_assert!(is_unterminated);
                    break;
                }
            }
            prop_assert!(lexer.position() <= input.len());
        }
    }

    #[test]
    fn plain_text_is_one_token_per_byte(
        input in proptest::collection::vec(any::<u8>().prop_filter("no ESC", |b| *b != 0x1B), 0..200)
    ) {
        let mut lexer = SequenceLexer::new(&input);
        let mut sink = CollectingSink::new();
        let mut count = 0;
        while let Some(token) = lexer.next_token(&mut sink).unwrap() {
            prop_assert!(!matches!(token, SequenceToken::Csi(_)));
            count += 1;
        }
        prop_assert_eq!(count, input.len());
    }

    #[test]
    fn alternate_buffer_leaves_transcript_unchanged(
        before in safe_capture(),
        inside in safe_capture(),
    ) {
        let baseline = transcript(&before, LineEnding::Lf, CollectingSink::new()).unwrap();

        let mut with_alt = before.clone();
        with_alt.extend_from_slice(b"\x1b[?1049h");
        with_alt.extend_from_slice(&inside);
        with_alt.extend_from_slice(b"\x1b[?1049l");

        let result = transcript(&with_alt, LineEnding::Lf, CollectingSink::new()).unwrap();
        prop_assert_eq!(result, baseline);
    }

    #[test]
    fn rendered_lines_have_no_trailing_whitespace(input in safe_capture()) {
        let screen = Simulator::new(&input, CollectingSink::new()).run().unwrap();
        let renderer = TextRenderer::new(LineEnding::Lf);
        let rendered = renderer.render(&screen);
        prop_assert_eq!(&renderer.render(&screen), &rendered);
        for line in rendered.split(|&b| b == b'\n') {
            prop_assert!(!line.last().is_some_and(|b| b.is_ascii_whitespace()));
        }
    }

    #[test]
    fn mask_preserves_length(input in safe_capture()) {
        let masked = Masker::default().mask(&input, &mut CollectingSink::new()).unwrap();
        prop_assert_eq!(masked.len(), input.len());
    }
}
