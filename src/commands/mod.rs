pub mod init;
pub mod tree;
pub mod view;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::parser::config::Config;
use crate::tui::loader::Source;
use crate::workspace;

/// Resolve where the snapshot comes from and which config applies.
///
/// `demo` and `snapshot` are mutually exclusive on the command line. `demo`
/// uses the built-in sample with default config. With neither, the snapshot
/// is found by walking up from `cwd`. Config comes from the enclosing
/// workspace when there is one.
pub fn resolve(demo: bool, snapshot: Option<PathBuf>, cwd: &Path) -> Result<(Source, Config)> {
    if demo {
        tracing::debug!("using built-in demo snapshot");
        return Ok((Source::Demo, Config::default()));
    }
    let root = workspace::find_root_from(cwd);
    if let Some(path) = snapshot {
        let config = match root {
            Ok(root) => workspace::load_config(&root)?,
            Err(_) => Config::default(),
        };
        return Ok((Source::File(path), config));
    }
    let root = root?;
    tracing::debug!(root = %root.display(), "found workspace");
    Ok((
        Source::File(workspace::graph_path(&root)),
        workspace::load_config(&root)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::filter::TypeFilter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn demo_ignores_workspace() {
        let dir = TempDir::new().unwrap();
        let (source, config) = resolve(true, None, dir.path()).unwrap();
        assert_eq!(source, Source::Demo);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_snapshot_works_outside_workspace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("elsewhere.json");
        let (source, _) = resolve(false, Some(path.clone()), dir.path()).unwrap();
        assert_eq!(source, Source::File(path));
    }

    #[test]
    fn discovered_workspace_supplies_snapshot_and_config() {
        let dir = TempDir::new().unwrap();
        init::run_in(dir.path()).unwrap();
        fs::write(workspace::config_path(dir.path()), "type_filter: issues\n").unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        let (source, config) = resolve(false, None, &nested).unwrap();
        assert_eq!(source, Source::File(workspace::graph_path(dir.path())));
        assert_eq!(config.type_filter, TypeFilter::Issues);
    }

    #[test]
    fn missing_workspace_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(resolve(false, None, dir.path()).is_err());
    }
}
