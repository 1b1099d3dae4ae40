//! Text rendering
//!
//! Folds the finished screen into a transcript: gaps become spaces, each
//! line loses its trailing whitespace, and blank lines at the very top and
//! bottom are dropped.

use serde::{Deserialize, Serialize};

use super::line::is_blank;
use super::screen::ScreenBuffer;

/// Line separator used when joining rendered lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Parse a line ending name ("lf" or "crlf")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lf" => Some(LineEnding::Lf),
            "crlf" => Some(LineEnding::CrLf),
            _ => None,
        }
    }

    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Converts a [`ScreenBuffer`] into transcript bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    line_ending: LineEnding,
}

impl TextRenderer {
    pub fn new(line_ending: LineEnding) -> Self {
        Self { line_ending }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Joined, trimmed screen contents. An all-blank screen renders empty.
    pub fn render(&self, screen: &ScreenBuffer) -> Vec<u8> {
        let lines: Vec<Vec<u8>> = screen.lines().iter().map(|l| l.to_trimmed_bytes()).collect();

        let is_blank_line = |line: &Vec<u8>| line.iter().all(|&b| is_blank(b));
        let Some(first) = lines.iter().position(|l| !is_blank_line(l)) else {
            return Vec::new();
        };
        let last = lines
            .iter()
            .rposition(|l| !is_blank_line(l))
            .unwrap_or(first);

        lines[first..=last].join(self.line_ending.as_bytes())
    }

    /// [`render`](Self::render) followed by exactly one line separator
    pub fn transcript(&self, screen: &ScreenBuffer) -> Vec<u8> {
        let mut out = self.render(screen);
        out.extend_from_slice(self.line_ending.as_bytes());
        out
    }

    /// [`render`](Self::render) decoded as UTF-8, invalid sequences replaced
    pub fn render_string(&self, screen: &ScreenBuffer) -> String {
        String::from_utf8_lossy(&self.render(screen)).into_owned()
    }
}
