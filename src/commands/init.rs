//! `kgnav init`: create `.kgnav/` with a sample snapshot and default config.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;

use crate::graph::demo::demo_graph;
use crate::parser::{config, snapshot};
use crate::workspace;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Entry point called from `main`.
pub fn run() -> Result<()> {
    let root = std::env::current_dir().context("failed to read the current directory")?;
    run_in(&root)
}

/// Run init inside `root`.
pub fn run_in(root: &Path) -> Result<()> {
    let dir = workspace::kgnav_dir(root);
    let graph_path = workspace::graph_path(root);

    if graph_path.exists() {
        bail!(
            "kgnav is already initialised ({} exists)",
            graph_path.display()
        );
    }

    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    // graph.json
    let graph = demo_graph();
    fs::write(&graph_path, snapshot::serialize(&graph)?)
        .with_context(|| format!("failed to write {}", graph_path.display()))?;
    println!(
        "  {} .kgnav/graph.json {}",
        "Created".green().bold(),
        format!("({} nodes, {} edges)", graph.nodes.len(), graph.edges.len()).dark_grey()
    );
    tracing::info!(path = %graph_path.display(), "sample snapshot written");

    // config.kgnav
    let config_path = workspace::config_path(root);
    if config_path.exists() {
        println!("  {} .kgnav/config.kgnav", "Kept".yellow().bold());
    } else {
        fs::write(&config_path, config::serialize(&config::Config::default()))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("  {} .kgnav/config.kgnav", "Created".green().bold());
    }

    println!(
        "  {} replace .kgnav/graph.json with your own snapshot, then run {}",
        "Next:".cyan().bold(),
        "kgnav view".bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_kgnav_directory() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(dir.path().join(".kgnav").is_dir());
    }

    #[test]
    fn writes_loadable_sample_snapshot() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        let graph = snapshot::load(&workspace::graph_path(dir.path())).unwrap();
        assert_eq!(graph, demo_graph());
    }

    #[test]
    fn writes_default_config() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        let content = fs::read_to_string(workspace::config_path(dir.path())).unwrap();
        assert_eq!(content, config::serialize(&config::Config::default()));
        assert_eq!(
            workspace::load_config(dir.path()).unwrap(),
            config::Config::default()
        );
    }

    #[test]
    fn keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(workspace::kgnav_dir(dir.path())).unwrap();
        fs::write(workspace::config_path(dir.path()), "show_hints: false\n").unwrap();
        run_in(dir.path()).unwrap();
        let content = fs::read_to_string(workspace::config_path(dir.path())).unwrap();
        assert_eq!(content, "show_hints: false\n");
    }

    #[test]
    fn refuses_to_run_twice() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        let err = run_in(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already initialised"));
    }

    #[test]
    fn init_makes_workspace_discoverable() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        let root = workspace::find_root_from(&dir.path().join("nested/deeper")).unwrap();
        assert_eq!(root, dir.path());
    }
}
