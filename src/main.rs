use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scout_deps::cli::{Cli, Commands, OutputFormat};
use scout_deps::graph::DependencyGraph;
use scout_deps::output::{render_report, summary_lines};
use scout_deps::{
    ScoutConfig, Settings, build_files_context, include_dependencies, resolve_config_path,
    scan_dependencies,
};

const LOG_LEVEL_ENV: &str = "SCOUT_LOG_LEVEL";
/// Map the raw `SCOUT_LOG_LEVEL` value to a filter directive.
///
/// Accepts the tracing level names plus `warning`, `critical` and `fatal`.
/// Returns the level and whether the raw value was rejected.
fn log_level(raw: Option<&str>) -> (&'static str, bool) {
    let Some(raw) = raw else {
        return ("info", false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "error" | "critical" | "fatal" => ("error", false),
        "warn" | "warning" => ("warn", false),
        "info" => ("info", false),
        "debug" => ("debug", false),
        "trace" => ("trace", false),
        _ => ("info", true),
    }
}

fn init_tracing() {
    let raw = std::env::var(LOG_LEVEL_ENV).ok();
    let (level, rejected) = log_level(raw.as_deref());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(level))
        .init();
    if rejected {
        warn!(
            "Invalid {LOG_LEVEL_ENV} {:?}; falling back to info.",
            raw.unwrap_or_default()
        );
    }
}

fn canonical_target(target: &Path) -> Result<PathBuf> {
    target
        .canonicalize()
        .with_context(|| format!("target directory {} does not exist", target.display()))
}

fn load_config(target: &Path, config: Option<&Path>) -> Result<ScoutConfig> {
    let config_path = resolve_config_path(target, config)?;
    let scout = ScoutConfig::load(&config_path)?;
    info!(
        "Loaded {} seed file(s) for contract type '{}'.",
        scout.files.len(),
        scout.contract_type().unwrap_or_default()
    );
    Ok(scout)
}

fn run_deps(
    target: &Path,
    config: Option<&Path>,
    depth: Option<i64>,
    format: &OutputFormat,
) -> Result<()> {
    let target = canonical_target(target)?;
    let scout = load_config(&target, config)?;
    let settings = Settings::load(&target);
    let depth = depth.unwrap_or(settings.dependencies.depth);

    let report = scan_dependencies(&scout.files, &target, depth);
    let graph = DependencyGraph::from_edges(&report.edges);

    print!("{}", render_report(&report, &graph, format, &target)?);
    for line in summary_lines(&report, &graph, &target) {
        eprintln!("{line}");
    }
    Ok(())
}

fn run_context(
    target: &Path,
    config: Option<&Path>,
    include_deps: bool,
    dependency_depth: Option<i64>,
) -> Result<()> {
    let target = canonical_target(target)?;
    let scout = load_config(&target, config)?;
    let settings = Settings::load(&target);

    let files = if include_deps || settings.dependencies.include {
        let depth = dependency_depth.unwrap_or(settings.dependencies.depth);
        include_dependencies(&scout.files, &target, depth)
    } else {
        scout.files
    };

    println!("{}", build_files_context(&files, &target));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Deps {
            target,
            config,
            depth,
            format,
        } => run_deps(&target, config.as_deref(), depth, &format),
        Commands::Context {
            target,
            config,
            include_deps,
            dependency_depth,
        } => run_context(&target, config.as_deref(), include_deps, dependency_depth),
    }
}
