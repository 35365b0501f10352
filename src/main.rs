mod commands;
mod graph;
mod logging;
mod parser;
mod tui;
mod workspace;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::tree::TreeArgs;
use crate::graph::filter::{StatusFilter, TypeFilter};

#[derive(Parser)]
#[command(
    name = "kgnav",
    version,
    about = "Navigate a typed project knowledge graph as a collapsible tree"
)]
struct Cli {
    /// Append log output to this file (logs are discarded otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Log at info level unless KGNAV_LOG or RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Use the built-in sample graph (no workspace required)
    #[arg(long)]
    demo: bool,
    /// Read this snapshot instead of the workspace's .kgnav/graph.json
    #[arg(long, value_name = "PATH", conflicts_with = "demo")]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Create .kgnav/ with a sample snapshot and default config
    Init,
    /// Open the interactive navigator
    View {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the filtered tree as plain text
    Tree {
        #[command(flatten)]
        source: SourceArgs,
        /// Type filter: all | work | issues | prs | files | commits
        #[arg(long = "type", value_name = "TYPE", value_parser = parse_type_filter)]
        kind: Option<TypeFilter>,
        /// Status filter: all | active | not_done | done
        #[arg(long, value_parser = parse_status_filter)]
        status: Option<StatusFilter>,
        /// Keep nodes whose title contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Line width used for title truncation
        #[arg(long, value_name = "COLUMNS")]
        width: Option<usize>,
    },
}

fn parse_type_filter(raw: &str) -> Result<TypeFilter, String> {
    TypeFilter::parse(raw)
        .ok_or_else(|| format!("unknown type filter '{raw}' (all|work|issues|prs|files|commits)"))
}

fn parse_status_filter(raw: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(raw)
        .ok_or_else(|| format!("unknown status filter '{raw}' (all|active|not_done|done)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.verbose)?;

    match cli.command {
        Command::Init => commands::init::run(),
        Command::View { source } => commands::view::run(source.demo, source.snapshot),
        Command::Tree {
            source,
            kind,
            status,
            search,
            width,
        } => commands::tree::run(TreeArgs {
            demo: source.demo,
            snapshot: source.snapshot,
            kind,
            status,
            search,
            width,
        }),
    }
}
