use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::tui::app;

pub fn run(demo: bool, snapshot: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let (source, config) = super::resolve(demo, snapshot, &cwd)?;
    app::run(source, config)
}
