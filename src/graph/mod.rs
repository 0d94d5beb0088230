use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Directed;
use petgraph::algo::kosaraju_scc;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use crate::resolver::{DependencyEdge, EdgeVia};

/// A set of files forming a circular dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDep {
    /// Files forming the cycle, ordered by path.
    /// The first file is repeated at the end to close the visual cycle.
    pub files: Vec<PathBuf>,
}

/// File-level dependency graph over the edges found by a traversal.
pub struct DependencyGraph {
    /// Nodes are canonical file paths; edge weights record how the dependency was found.
    pub graph: StableGraph<PathBuf, EdgeVia, Directed>,
    /// Maps file paths to their node indices for O(1) lookup.
    pub file_index: HashMap<PathBuf, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            file_index: HashMap::new(),
        }
    }

    /// Build a graph from traversal edges. Repeated edges between the same pair are kept once.
    pub fn from_edges(edges: &[DependencyEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            let from = graph.add_file(&edge.from);
            let to = graph.add_file(&edge.to);
            if !graph.graph.contains_edge(from, to) {
                graph.graph.add_edge(from, to, edge.via.clone());
            }
        }
        graph
    }

    /// Add a file node, or return the existing index for that path.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&existing) = self.file_index.get(path) {
            return existing;
        }
        let idx = self.graph.add_node(path.to_path_buf());
        self.file_index.insert(path.to_path_buf(), idx);
        idx
    }

    pub fn file_count(&self) -> usize {
        self.file_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Detect cycles with Kosaraju's SCC algorithm.
    ///
    /// SCCs with more than one file are cycles. Returned sorted by their first file.
    pub fn cycles(&self) -> Vec<CircularDep> {
        let mut cycles: Vec<CircularDep> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut files: Vec<PathBuf> =
                    scc.iter().map(|&idx| self.graph[idx].clone()).collect();
                files.sort();
                let first = files[0].clone();
                files.push(first);
                CircularDep { files }
            })
            .collect();

        cycles.sort_by(|a, b| a.files[0].cmp(&b.files[0]));
        cycles
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
