use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::graph::DependencyGraph;
use crate::resolver::{EdgeVia, relative_display};

/// DOT node ID for a graph node. The file path goes in the label only.
fn node_id(idx: NodeIndex) -> String {
    format!("n{}", idx.index())
}

fn edge_style(via: &EdgeVia) -> &'static str {
    match via {
        EdgeVia::Module(_) => "style=solid",
        EdgeVia::Use(_) => "style=dashed",
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the file graph as a Graphviz digraph.
///
/// Nodes are labelled relative to `project_root` and emitted in path order.
/// `mod` edges are solid, `use` edges dashed. Files that sit on a cycle are
/// filled red.
pub fn render_dot(graph: &DependencyGraph, project_root: &Path) -> String {
    let mut out = String::new();
    out.push_str("digraph dependencies {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box style=filled fillcolor=\"#AED6F1\"];\n");

    let on_cycle: HashSet<NodeIndex> = graph
        .cycles()
        .iter()
        .flat_map(|c| c.files.iter())
        .filter_map(|p| graph.file_index.get(p.as_path()).copied())
        .collect();

    let mut nodes: Vec<_> = graph.file_index.iter().collect();
    nodes.sort_by(|a, b| a.0.cmp(b.0));

    for &(ref path, &idx) in &nodes {
        let label = relative_display(path, project_root);
        let fill = if on_cycle.contains(&idx) {
            " fillcolor=\"#F1948A\""
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "    {} [label=\"{}\"{}];",
            node_id(idx),
            escape_label(&label),
            fill
        );
    }

    // Sorted by path so output is stable across runs.
    let mut edges: Vec<(&Path, &Path, NodeIndex, NodeIndex, &'static str)> = graph
        .graph
        .edge_references()
        .map(|edge| {
            (
                graph.graph[edge.source()].as_path(),
                graph.graph[edge.target()].as_path(),
                edge.source(),
                edge.target(),
                edge_style(edge.weight()),
            )
        })
        .collect();
    edges.sort();

    for (_, _, src, tgt, style) in &edges {
        let _ = writeln!(out, "    {} -> {} [{}];", node_id(*src), node_id(*tgt), style);
    }

    out.push_str("}\n");
    out
}
