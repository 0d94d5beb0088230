use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Expand a `.scout` seed list into the local Rust source files it depends on.
///
/// scout-deps parses each seed with tree-sitter, follows `mod` declarations and
/// `use` paths to files under the target directory, and stops at a depth limit.
#[derive(Parser, Debug)]
#[command(
    name = "scout-deps",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for the dependency report.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// One file per line, seeds first (default).
    #[default]
    Compact,
    /// Structured report with edges, issues and cycles.
    Json,
    /// Graphviz digraph of the resolved edges.
    Dot,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the seed files and the local files they depend on.
    Deps {
        /// Project directory the seeds are relative to.
        #[arg(default_value = ".")]
        target: PathBuf,

        /// Directory containing `.scout`, or the `.scout` file itself. Defaults to TARGET.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Traversal depth. Overrides `scout-deps.toml`; values below 1 list seeds only.
        #[arg(short, long, allow_negative_numbers = true)]
        depth: Option<i64>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Print the seed files (optionally with dependencies) as one text block.
    Context {
        /// Project directory the seeds are relative to.
        #[arg(default_value = ".")]
        target: PathBuf,

        /// Directory containing `.scout`, or the `.scout` file itself. Defaults to TARGET.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Expand the seed list with local dependencies first.
        #[arg(long)]
        include_deps: bool,

        /// Traversal depth used with `--include-deps`.
        #[arg(long, allow_negative_numbers = true)]
        dependency_depth: Option<i64>,
    },
}
