//! `.kgnav/config.kgnav`: `key: value` lines with `#` comments.

use anyhow::{Result, bail};

use crate::graph::filter::{StatusFilter, TypeFilter};
use crate::tui::view::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub type_filter: TypeFilter,
    pub status_filter: StatusFilter,
    pub start_view: ViewMode,
    /// Collapse every node that has children when a snapshot is first shown.
    pub start_collapsed: bool,
    pub show_hints: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_filter: TypeFilter::All,
            status_filter: StatusFilter::All,
            start_view: ViewMode::Graph,
            start_collapsed: false,
            show_hints: true,
        }
    }
}

pub fn parse(input: &str) -> Result<Config> {
    let mut config = Config::default();
    for (i, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("config line {}: expected `key: value`", i + 1);
        };
        let value = value.trim();
        match key.trim() {
            "type_filter" => {
                config.type_filter = TypeFilter::parse(value).ok_or_else(|| {
                    anyhow::anyhow!("config line {}: unknown type_filter '{}'", i + 1, value)
                })?;
            }
            "status_filter" => {
                config.status_filter = StatusFilter::parse(value).ok_or_else(|| {
                    anyhow::anyhow!("config line {}: unknown status_filter '{}'", i + 1, value)
                })?;
            }
            "start_view" => {
                config.start_view = ViewMode::parse(value).ok_or_else(|| {
                    anyhow::anyhow!("config line {}: unknown start_view '{}'", i + 1, value)
                })?;
            }
            "start_collapsed" => config.start_collapsed = parse_bool(value, i + 1)?,
            "show_hints" => config.show_hints = parse_bool(value, i + 1)?,
            other => bail!("config line {}: unknown key '{}'", i + 1, other),
        }
    }
    Ok(config)
}

pub fn serialize(config: &Config) -> String {
    format!(
        "\
# kgnav configuration

# Type filter applied at startup
# Options: all | work | issues | prs | files | commits
type_filter: {}

# Status filter applied at startup
# Options: all | active | not_done | done
status_filter: {}

# View shown at startup
# Options: graph | details | relationships
start_view: {}

# Start with every node that has children folded
start_collapsed: {}

# Show the key hint line under the status bar
show_hints: {}
",
        config.type_filter.label(),
        config.status_filter.label(),
        config.start_view.label(),
        config.start_collapsed,
        config.show_hints
    )
}

fn parse_bool(value: &str, line: usize) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => bail!("config line {}: expected true or false, got '{}'", line, value),
    }
}
