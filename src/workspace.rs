//! Paths and discovery for the `.kgnav/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::parser::config::{self, Config};

pub const DIR_NAME: &str = ".kgnav";

/// Walk upward from `start` to find the directory containing `.kgnav/graph.json`.
pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if graph_path(dir).exists() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!(
                "no {DIR_NAME}/graph.json found above {}; run `kgnav init`, pass --snapshot, or use --demo",
                start.display()
            ),
        }
    }
}

pub fn kgnav_dir(root: &Path) -> PathBuf {
    root.join(DIR_NAME)
}

pub fn graph_path(root: &Path) -> PathBuf {
    kgnav_dir(root).join("graph.json")
}

pub fn config_path(root: &Path) -> PathBuf {
    kgnav_dir(root).join("config.kgnav")
}

/// Read the config at `root`, falling back to defaults when it is absent.
pub fn load_config(root: &Path) -> Result<Config> {
    let path = config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    config::parse(&text).with_context(|| format!("invalid config {}", path.display()))
}
