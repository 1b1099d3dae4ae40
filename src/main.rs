//! script-cat
//!
//! Reads terminal session captures (stdin or files) and prints the text
//! that was left on screen.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scriptcat::{process, CliArgs, Config, Result, TracingSink};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("script-cat: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args.files, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("script-cat: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(files: &[PathBuf], config: &Config) -> Result<()> {
    if files.is_empty() {
        let mut input = Vec::new();
        io::stdin().lock().read_to_end(&mut input)?;
        let output = process(&input, config, TracingSink)?;
        return write_stdout(&output);
    }

    for path in files {
        tracing::info!("Processing {}", path.display());
        let input = fs::read(path)?;
        let output = process(&input, config, TracingSink)?;

        match &config.in_place_suffix {
            Some(suffix) => {
                let target = with_suffix(path, suffix);
                tracing::info!("Writing {}", target.display());
                fs::write(&target, &output)?;
            }
            None => write_stdout(&output)?,
        }
    }

    Ok(())
}

fn write_stdout(output: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output)?;
    stdout.flush()?;
    Ok(())
}

/// `log.raw` + `.txt` -> `log.raw.txt`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
