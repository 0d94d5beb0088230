use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::export::render_dot;
use crate::graph::{CircularDep, DependencyGraph};
use crate::resolver::{EdgeVia, relative_display};
use crate::traverse::DependencyReport;

/// Serialisable view of a [`DependencyReport`], with paths relative to the project root.
#[derive(Debug, Serialize)]
pub struct ReportJson {
    pub files: Vec<String>,
    pub edges: Vec<EdgeJson>,
    pub issues: Vec<IssueJson>,
    /// Each cycle lists its files in path order, first file repeated at the end.
    pub cycles: Vec<Vec<String>>,
    pub max_depth: usize,
    pub seed_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EdgeJson {
    pub from: String,
    pub to: String,
    /// `"mod"` or `"use"`.
    pub kind: &'static str,
    pub via: String,
}

#[derive(Debug, Serialize)]
pub struct IssueJson {
    pub kind: &'static str,
    pub message: String,
}

fn relative_cycle(cycle: &CircularDep, project_root: &Path) -> Vec<String> {
    cycle
        .files
        .iter()
        .map(|p| relative_display(p, project_root))
        .collect()
}

impl ReportJson {
    pub fn new(report: &DependencyReport, graph: &DependencyGraph, project_root: &Path) -> Self {
        let edges = report
            .edges
            .iter()
            .map(|e| {
                let (kind, via) = match &e.via {
                    EdgeVia::Module(name) => ("mod", name.clone()),
                    EdgeVia::Use(path) => ("use", path.clone()),
                };
                EdgeJson {
                    from: relative_display(&e.from, project_root),
                    to: relative_display(&e.to, project_root),
                    kind,
                    via,
                }
            })
            .collect();

        let issues = report
            .issues
            .iter()
            .map(|i| IssueJson {
                kind: i.kind(),
                message: i.to_string(),
            })
            .collect();

        Self {
            files: report.files.clone(),
            edges,
            issues,
            cycles: graph
                .cycles()
                .iter()
                .map(|c| relative_cycle(c, project_root))
                .collect(),
            max_depth: report.max_depth,
            seed_count: report.seed_count,
        }
    }
}

/// Render the stdout body for a report.
///
/// - `Compact`: one file per line, seeds first.
/// - `Json`: pretty-printed [`ReportJson`].
/// - `Dot`: Graphviz digraph of the resolved edges.
pub fn render_report(
    report: &DependencyReport,
    graph: &DependencyGraph,
    format: &OutputFormat,
    project_root: &Path,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Compact => {
            let mut out = String::new();
            for file in &report.files {
                out.push_str(file);
                out.push('\n');
            }
            out
        }
        OutputFormat::Json => {
            let json = ReportJson::new(report, graph, project_root);
            let mut out = serde_json::to_string_pretty(&json)?;
            out.push('\n');
            out
        }
        OutputFormat::Dot => render_dot(graph, project_root),
    })
}

/// One-line-per-fact summary for stderr, so stdout stays clean for the file list.
///
/// Unresolved `use` paths are counted but not listed; most are external crates.
pub fn summary_lines(
    report: &DependencyReport,
    graph: &DependencyGraph,
    project_root: &Path,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} files ({} seeds, depth {}), {} edges",
        report.files.len(),
        report.seed_count,
        report.max_depth,
        report.edges.len(),
    )];

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for issue in &report.issues {
        *counts.entry(issue.kind()).or_insert(0) += 1;
    }
    if !counts.is_empty() {
        let parts: Vec<String> = counts.iter().map(|(k, n)| format!("{n} {k}")).collect();
        lines.push(format!("  issues: {}", parts.join(", ")));
    }

    for cycle in graph.cycles() {
        lines.push(format!(
            "  cycle {}",
            relative_cycle(&cycle, project_root).join(" -> ")
        ));
    }
    lines
}
