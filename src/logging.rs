//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so log lines never go to stdout or stderr:
//! they are appended to `--log-file` when given and dropped otherwise.
//!
//! Filter priority: `KGNAV_LOG`, then `RUST_LOG`, then `info` with
//! `--verbose` or `warn` without.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const ENV_VAR: &str = "KGNAV_LOG";

pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let filter = build_env_filter(verbose);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .context("failed to install log subscriber")?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::sink).with_ansi(false))
                .try_init()
                .context("failed to install log subscriber")?;
        }
    }
    Ok(())
}

fn default_level(verbose: bool) -> Level {
    if verbose { Level::INFO } else { Level::WARN }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    select_filter(
        std::env::var(ENV_VAR).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        verbose,
    )
}

/// First non-blank, parseable directive set wins; otherwise the default level.
fn select_filter(own: Option<String>, rust_log: Option<String>, verbose: bool) -> EnvFilter {
    [own, rust_log]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(&directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level(verbose).as_str()))
}
