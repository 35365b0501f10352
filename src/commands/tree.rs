//! `kgnav tree`: print the filtered forest as plain text.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::graph::filter::{FilterSpec, StatusFilter, TypeFilter};
use crate::graph::forest::CollapseState;
use crate::graph::model::Graph;
use crate::tui::render;
use crate::tui::state::Derived;

pub const DEFAULT_WIDTH: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct TreeArgs {
    pub demo: bool,
    pub snapshot: Option<PathBuf>,
    /// Overrides the configured type filter.
    pub kind: Option<TypeFilter>,
    /// Overrides the configured status filter.
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub width: Option<usize>,
}

pub fn run(args: TreeArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let (source, config) = super::resolve(args.demo, args.snapshot, &cwd)?;
    let graph = source
        .load()
        .with_context(|| format!("failed to load snapshot from {}", source.describe()))?;
    let spec = FilterSpec {
        kind: args.kind.unwrap_or(config.type_filter),
        status: args.status.unwrap_or(config.status_filter),
        search: args.search.unwrap_or_default(),
    };
    for line in render_lines(&graph, &spec, args.width.unwrap_or(DEFAULT_WIDTH)) {
        println!("{line}");
    }
    Ok(())
}

/// The fully expanded tree as plain lines.
pub fn render_lines(graph: &Graph, spec: &FilterSpec, width: usize) -> Vec<String> {
    let derived = Derived::compute(graph, spec);
    tracing::debug!(
        matches = derived.graph.nodes.len(),
        total = graph.nodes.len(),
        "rendering tree"
    );
    render::render_tree(
        &derived.forest,
        &derived.graph,
        &CollapseState::new(),
        None,
        width,
    )
    .plain()
}
