//! Configuration for script-cat
//!
//! Settings are layered, later layers winning:
//! defaults < config file < environment variables < command-line arguments.
//!
//! The config file is TOML and lives at `<config_dir>/script-cat/config.toml`
//! unless `--config` points elsewhere:
//!
//! ```toml
//! line_ending = "crlf"
//! mode = "transcript"
//! mask_placeholder = "#"
//! encoding = "sjis"
//! max_count = 100000
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::LineEnding;
use crate::encoding::SourceEncoding;
use crate::mask::DEFAULT_PLACEHOLDER;

/// CLI arguments for script-cat
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "script-cat")]
#[command(version)]
#[command(
    about = "Print the text a terminal session capture would have shown on screen",
    long_about = None
)]
pub struct CliArgs {
    /// Capture files to process (stdin if none)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Write each result to FILE + SUFFIX instead of stdout
    #[arg(short = 'i', long = "in-place", value_name = "SUFFIX")]
    pub in_place: Option<String>,

    /// Separate lines with CRLF
    #[arg(long, conflicts_with = "lf")]
    pub crlf: bool,

    /// Separate lines with LF
    #[arg(long)]
    pub lf: bool,

    /// Trace the escape sequences instead of rendering a transcript
    #[arg(long, conflicts_with = "dump")]
    pub mask: bool,

    /// Print the final screen buffer as JSON
    #[arg(long)]
    pub dump: bool,

    /// Replacement for non-printable bytes in --mask output
    #[arg(long, value_name = "CHAR")]
    pub placeholder: Option<char>,

    /// Decode the transcript as Shift_JIS and write UTF-8
    #[arg(long, conflicts_with_all = ["eucjp", "utf8"])]
    pub sjis: bool,

    /// Decode the transcript as EUC-JP and write UTF-8
    #[arg(long, conflicts_with = "utf8")]
    pub eucjp: bool,

    /// Decode the transcript as UTF-8, replacing invalid bytes
    #[arg(long)]
    pub utf8: bool,

    /// Clamp cursor movement counts and columns to N
    #[arg(long, value_name = "N")]
    pub max_count: Option<u32>,

    /// Path to a config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn encoding(&self) -> Option<SourceEncoding> {
        if self.sjis {
            Some(SourceEncoding::ShiftJis)
        } else if self.eucjp {
            Some(SourceEncoding::EucJp)
        } else if self.utf8 {
            Some(SourceEncoding::Utf8)
        } else {
            None
        }
    }
}

/// What to produce for each input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Rendered plain-text transcript
    #[default]
    Transcript,
    /// Token trace with literal text masked
    Mask,
    /// JSON dump of the final screen buffer
    Dump,
}

impl OutputMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "transcript" => Some(OutputMode::Transcript),
            "mask" => Some(OutputMode::Mask),
            "dump" => Some(OutputMode::Dump),
            _ => None,
        }
    }
}

/// Effective settings for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Separator between transcript lines
    pub line_ending: LineEnding,
    /// Output mode
    pub mode: OutputMode,
    /// Replacement for masked bytes (printable ASCII)
    pub mask_placeholder: char,
    /// Suffix for in-place output files
    pub in_place_suffix: Option<String>,
    /// Transcript source encoding; `None` writes the captured bytes as-is
    pub encoding: Option<SourceEncoding>,
    /// Upper bound for movement counts and columns
    pub max_count: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            mode: OutputMode::Transcript,
            mask_placeholder: char::from(DEFAULT_PLACEHOLDER),
            in_place_suffix: None,
            encoding: None,
            max_count: None,
        }
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl ConfigError {
    fn new(message: impl Into<String>, field: Option<&str>) -> Self {
        Self {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    ///
    /// # Errors
    ///
    /// Fails when an explicitly named config file cannot be loaded or the
    /// final settings do not validate.
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default_file(),
        };

        config.apply_env_vars();
        config.apply_cli_args(args);
        config.validate()?;

        if config.in_place_suffix.is_some() && args.files.is_empty() {
            return Err(ConfigError::new(
                "in-place output requires input files",
                Some("in_place_suffix"),
            ));
        }

        Ok(config)
    }

    /// Defaults, overlaid with the default config file if one exists
    fn load_default_file() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for [`Config`].
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e), None)
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config file: {}", e), None))
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("script-cat").join("config.toml"))
    }

    fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    /// Apply `SCRIPTCAT_*` variables read through `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SCRIPTCAT_LINE_ENDING") {
            match LineEnding::from_name(&val) {
                Some(line_ending) => self.line_ending = line_ending,
                None => tracing::warn!("Ignoring SCRIPTCAT_LINE_ENDING={:?}", val),
            }
        }
        if let Some(val) = lookup("SCRIPTCAT_MODE") {
            match OutputMode::from_name(&val) {
                Some(mode) => self.mode = mode,
                None => tracing::warn!("Ignoring SCRIPTCAT_MODE={:?}", val),
            }
        }
        if let Some(val) = lookup("SCRIPTCAT_MASK_PLACEHOLDER") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.mask_placeholder = c,
                _ => tracing::warn!("Ignoring SCRIPTCAT_MASK_PLACEHOLDER={:?}", val),
            }
        }
        if let Some(val) = lookup("SCRIPTCAT_ENCODING") {
            match SourceEncoding::from_name(&val) {
                Some(encoding) => self.encoding = Some(encoding),
                None => tracing::warn!("Ignoring SCRIPTCAT_ENCODING={:?}", val),
            }
        }
        if let Some(val) = lookup("SCRIPTCAT_MAX_COUNT") {
            match val.parse() {
                Ok(max) => self.max_count = Some(max),
                Err(_) => tracing::warn!("Ignoring SCRIPTCAT_MAX_COUNT={:?}", val),
            }
        }
    }

    fn apply_cli_args(&mut self, args: &CliArgs) {
        if args.crlf {
            self.line_ending = LineEnding::CrLf;
        }
        if args.lf {
            self.line_ending = LineEnding::Lf;
        }
        if args.mask {
            self.mode = OutputMode::Mask;
        }
        if args.dump {
            self.mode = OutputMode::Dump;
        }
        if let Some(placeholder) = args.placeholder {
            self.mask_placeholder = placeholder;
        }
        if let Some(encoding) = args.encoding() {
            self.encoding = Some(encoding);
        }
        if let Some(max) = args.max_count {
            self.max_count = Some(max);
        }
        if let Some(suffix) = &args.in_place {
            self.in_place_suffix = Some(suffix.clone());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.mask_placeholder.is_ascii_graphic() && self.mask_placeholder != ' ' {
            return Err(ConfigError::new(
                format!(
                    "Placeholder must be a printable ASCII character, got {:?}",
                    self.mask_placeholder
                ),
                Some("mask_placeholder"),
            ));
        }
        if self.in_place_suffix.as_deref() == Some("") {
            return Err(ConfigError::new(
                "Suffix must not be empty, it would overwrite the input",
                Some("in_place_suffix"),
            ));
        }
        if self.max_count == Some(0) {
            return Err(ConfigError::new(
                "Count limit must be at least 1",
                Some("max_count"),
            ));
        }
        Ok(())
    }

    /// The placeholder as a byte. Validation guarantees it is ASCII.
    pub fn placeholder_byte(&self) -> u8 {
        u8::try_from(self.mask_placeholder).unwrap_or(DEFAULT_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("script-cat").chain(argv.iter().copied()))
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert_eq!(config.mode, OutputMode::Transcript);
        assert_eq!(config.placeholder_byte(), b'x');
        assert!(config.in_place_suffix.is_none());
    }

    #[test]
    fn test_config_toml_parsing() {
        let toml_str = r##"
            line_ending = "crlf"
            mode = "mask"
            mask_placeholder = "#"
            encoding = "sjis"
        "##;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.line_ending, LineEnding::CrLf);
        assert_eq!(config.mode, OutputMode::Mask);
        assert_eq!(config.mask_placeholder, '#');
        assert_eq!(config.encoding, Some(SourceEncoding::ShiftJis));
    }

    #[test]
    fn test_config_toml_partial() {
        let config: Config = toml::from_str("mode = \"dump\"").unwrap();
        assert_eq!(config.mode, OutputMode::Dump);
        assert_eq!(config.line_ending, LineEnding::Lf);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SCRIPTCAT_LINE_ENDING", "CRLF"),
            ("SCRIPTCAT_MODE", "bogus"),
            ("SCRIPTCAT_MASK_PLACEHOLDER", "*"),
            ("SCRIPTCAT_ENCODING", "euc-jp"),
            ("SCRIPTCAT_MAX_COUNT", "many"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.line_ending, LineEnding::CrLf);
        assert_eq!(config.mode, OutputMode::Transcript);
        assert_eq!(config.mask_placeholder, '*');
        assert_eq!(config.encoding, Some(SourceEncoding::EucJp));
        assert_eq!(config.max_count, None);
    }

    #[test]
    fn test_cli_overrides_file_settings() {
        let mut config = Config {
            line_ending: LineEnding::CrLf,
            ..Config::default()
        };
        config.apply_cli_args(&args(&["--lf", "--mask", "--placeholder", "?"]));

        assert_eq!(config.line_ending, LineEnding::Lf);
        assert_eq!(config.mode, OutputMode::Mask);
        assert_eq!(config.placeholder_byte(), b'?');
    }

    #[test]
    fn test_cli_parsing() {
        let parsed = args(&["-i", ".txt", "--crlf", "a.log", "b.log"]);
        assert_eq!(parsed.in_place.as_deref(), Some(".txt"));
        assert!(parsed.crlf);
        assert_eq!(parsed.files.len(), 2);
    }

    #[test]
    fn test_cli_encoding_flags() {
        let mut config = Config::default();
        config.apply_cli_args(&args(&["--sjis", "--max-count", "500"]));
        assert_eq!(config.encoding, Some(SourceEncoding::ShiftJis));
        assert_eq!(config.max_count, Some(500));

        config.apply_cli_args(&args(&["--utf8"]));
        assert_eq!(config.encoding, Some(SourceEncoding::Utf8));

        assert!(CliArgs::try_parse_from(["script-cat", "--sjis", "--eucjp"]).is_err());
        assert!(CliArgs::try_parse_from(["script-cat", "--eucjp", "--utf8"]).is_err());
    }

    #[test]
    fn test_zero_count_limit_rejected() {
        let config = Config {
            max_count: Some(0),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().field.as_deref(), Some("max_count"));
    }

    #[test]
    fn test_cli_conflicts() {
        let argv = ["script-cat", "--crlf", "--lf"];
        assert!(CliArgs::try_parse_from(argv).is_err());
        let argv = ["script-cat", "--mask", "--dump"];
        assert!(CliArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_validate_placeholder() {
        let config = Config {
            mask_placeholder: 'é',
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("mask_placeholder"));
    }

    #[test]
    fn test_in_place_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let err = Config::load_with_args(&args(&["-c", &config_arg, "-i", ".txt"])).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("in_place_suffix"));

        let ok = Config::load_with_args(&args(&["-c", &config_arg, "-i", ".txt", "in.log"]));
        assert_eq!(ok.unwrap().in_place_suffix.as_deref(), Some(".txt"));
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let config = Config {
            in_place_suffix: Some(String::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "line_ending = \"crlf\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.line_ending, LineEnding::CrLf);

        fs::write(&path, "line_ending = 3\n").unwrap();
        assert!(Config::load_from_file(&path).is_err());
        assert!(Config::load_from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("bad", Some("mode"));
        assert_eq!(err.to_string(), "Config error in 'mode': bad");
        assert_eq!(ConfigError::new("bad", None).to_string(), "Config error: bad");
    }
}
