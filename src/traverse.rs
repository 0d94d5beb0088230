//! Depth-limited breadth-first expansion from a seed file list.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ScanIssue;
use crate::resolver::{DependencyEdge, find_dependencies, relative_display};

/// Result of one traversal.
#[derive(Debug, Default)]
pub struct DependencyReport {
    /// Seeds first (verbatim, input order), then dependencies in BFS discovery order.
    pub files: Vec<String>,
    /// Every resolved reference, including ones pointing at already-visited files.
    pub edges: Vec<DependencyEdge>,
    /// Non-fatal problems met along the way.
    pub issues: Vec<ScanIssue>,
    /// Depth limit after clamping.
    pub max_depth: usize,
    /// Number of seed strings supplied.
    pub seed_count: usize,
}

/// The queue, visited set and ordered result list of one traversal.
///
/// Owned by a single call; nothing here outlives it.
struct TraversalState {
    queue: VecDeque<(PathBuf, usize)>,
    visited: HashSet<PathBuf>,
    files: Vec<String>,
    listed: HashSet<String>,
}

impl TraversalState {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            files: Vec::new(),
            listed: HashSet::new(),
        }
    }

    fn list(&mut self, display: String) {
        if self.listed.insert(display.clone()) {
            self.files.push(display);
        }
    }

    /// Mark `path` visited and queue it. Returns false if it was already visited.
    fn visit(&mut self, path: PathBuf, depth: usize) -> bool {
        if !self.visited.insert(path.clone()) {
            return false;
        }
        self.queue.push_back((path, depth));
        true
    }
}

/// Clamp a caller-supplied depth: anything below 1 means "seeds only".
pub fn clamp_depth(max_depth: i64) -> usize {
    if max_depth < 1 {
        info!("Dependency depth < 1 provided; returning original file list only.");
        0
    } else {
        max_depth as usize
    }
}

/// Expand `seeds` (paths relative to `project_root`) into the files they depend on.
///
/// `project_root` is canonicalized here; if that fails it is used as given and
/// every seed will simply be reported as missing.
pub fn scan_dependencies<S: AsRef<str>>(
    seeds: &[S],
    project_root: &Path,
    max_depth: i64,
) -> DependencyReport {
    let max_depth = clamp_depth(max_depth);
    let root = project_root
        .canonicalize()
        .unwrap_or_else(|_| project_root.to_path_buf());

    let mut state = TraversalState::new();
    let mut report = DependencyReport {
        max_depth,
        seed_count: seeds.len(),
        ..DependencyReport::default()
    };

    for seed in seeds {
        let seed: &str = seed.as_ref();
        state.list(seed.to_owned());
        match root.join(seed).canonicalize() {
            Ok(canonical) => {
                state.visit(canonical, 0);
            }
            Err(_) => {
                let issue = ScanIssue::UnreadableSeed {
                    seed: seed.to_owned(),
                };
                warn!("{issue}");
                report.issues.push(issue);
            }
        }
    }

    if !seeds.is_empty() {
        info!(
            "Dependency scan queued {} file(s) with depth limit {}.",
            state.queue.len(),
            max_depth,
        );
    }

    while let Some((current, depth)) = state.queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        let deps = find_dependencies(&current, &root);
        for edge in &deps.edges {
            if state.visit(edge.to.clone(), depth + 1) {
                state.list(relative_display(&edge.to, &root));
            }
        }
        report.edges.extend(deps.edges);
        report.issues.extend(deps.issues);
    }

    if max_depth > 0 {
        info!(
            "Dependency inclusion enabled. Base files: {} total files after expansion: {}.",
            seeds.len(),
            state.files.len(),
        );
    }

    report.files = state.files;
    report
}

/// Expand `seeds` and return only the ordered, deduplicated file list.
pub fn include_dependencies<S: AsRef<str>>(
    seeds: &[S],
    project_root: &Path,
    max_depth: i64,
) -> Vec<String> {
    scan_dependencies(seeds, project_root, max_depth).files
}
