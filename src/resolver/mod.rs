pub mod rust_paths;

pub use rust_paths::{
    ImportResolution, derive_base, is_within_root, resolve_import, resolve_module,
    resolve_use_entry,
};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ScanIssue;
use crate::parser::scan_file;

/// How a dependency was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeVia {
    /// `mod name;`
    Module(String),
    /// A flattened use path, rendered as written (`crate::util::helper`).
    Use(String),
}

/// Declaring file → resolved file. Both paths are canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    pub via: EdgeVia,
}

/// Everything resolved out of one file.
#[derive(Debug, Default)]
pub struct FileDependencies {
    /// One edge per distinct target, in discovery order: modules first, then uses.
    pub edges: Vec<DependencyEdge>,
    pub issues: Vec<ScanIssue>,
}

impl FileDependencies {
    pub fn targets(&self) -> impl Iterator<Item = &Path> {
        self.edges.iter().map(|e| e.to.as_path())
    }

    fn push_issue(&mut self, issue: ScanIssue) {
        warn!("{issue}");
        self.issues.push(issue);
    }
}

/// Render `path` relative to `project_root`, or in full if it is not under it.
pub fn relative_display(path: &Path, project_root: &Path) -> String {
    match path.strip_prefix(project_root) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

/// Scan `current_file` and resolve its `mod` declarations and `use` paths.
///
/// Both `current_file` and `project_root` must already be canonical.
/// A file that cannot be read or decoded yields zero dependencies and one issue.
/// Unresolvable references and root escapes are recorded and skipped.
pub fn find_dependencies(current_file: &Path, project_root: &Path) -> FileDependencies {
    let mut deps = FileDependencies::default();

    let scan = match scan_file(current_file) {
        Ok(scan) => scan,
        Err(issue) => {
            deps.push_issue(issue);
            return deps;
        }
    };

    info!(
        "Scanning {} (declares {} modules, {} use statements).",
        relative_display(current_file, project_root),
        scan.modules.len(),
        scan.imports.len(),
    );

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let parent_dir = current_file.parent().unwrap_or(project_root);

    for name in &scan.modules {
        match resolve_module(name, parent_dir) {
            None => deps.push_issue(ScanIssue::UnresolvedModule {
                name: name.clone(),
                declared_in: current_file.to_path_buf(),
            }),
            Some(resolved) if !is_within_root(&resolved, project_root) => {
                deps.push_issue(ScanIssue::RootEscape {
                    reference: format!("mod {name}"),
                    declared_in: current_file.to_path_buf(),
                    resolved,
                })
            }
            Some(resolved) => {
                info!(
                    "Dependency detected: {} declares module '{}' -> {}",
                    relative_display(current_file, project_root),
                    name,
                    relative_display(&resolved, project_root),
                );
                if seen.insert(resolved.clone()) {
                    deps.edges.push(DependencyEdge {
                        from: current_file.to_path_buf(),
                        to: resolved,
                        via: EdgeVia::Module(name.clone()),
                    });
                }
            }
        }
    }

    for entry in &scan.imports {
        let rendered = entry.to_string();
        match resolve_use_entry(entry, current_file, project_root) {
            ImportResolution::Resolved(resolved) => {
                if !seen.insert(resolved.clone()) {
                    continue;
                }
                info!(
                    "Use dependency detected: {} references '{}' -> {}",
                    relative_display(current_file, project_root),
                    rendered,
                    relative_display(&resolved, project_root),
                );
                deps.edges.push(DependencyEdge {
                    from: current_file.to_path_buf(),
                    to: resolved,
                    via: EdgeVia::Use(rendered),
                });
            }
            ImportResolution::NoModulePath => {}
            ImportResolution::Unresolved => {
                // Mostly std and external crates; not worth a warning.
                debug!(
                    "Use path '{}' from {} has no local file.",
                    rendered,
                    relative_display(current_file, project_root),
                );
                deps.issues.push(ScanIssue::UnresolvedImport {
                    path: rendered,
                    declared_in: current_file.to_path_buf(),
                });
            }
            ImportResolution::OutsideRoot(resolved) => deps.push_issue(ScanIssue::RootEscape {
                reference: rendered,
                declared_in: current_file.to_path_buf(),
                resolved,
            }),
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_modules_then_uses_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let lib = write(
            &root,
            "lib.rs",
            "mod util;\nmod risk;\nuse crate::util::helper;\nuse risk::throttler::Guard;\n",
        );
        write(&root, "util.rs", "");
        write(&root, "risk/mod.rs", "");
        write(&root, "risk/throttler.rs", "");

        let deps = find_dependencies(&lib, &root);
        let targets: Vec<String> = deps.targets().map(|t| relative_display(t, &root)).collect();
        assert_eq!(targets, vec!["util.rs", "risk/mod.rs", "risk/throttler.rs"]);
        assert_eq!(deps.edges[0].via, EdgeVia::Module("util".into()));
        assert_eq!(deps.edges[2].via, EdgeVia::Use("risk::throttler::Guard".into()));
    }

    #[test]
    fn test_unresolved_module_and_external_use_are_issues() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let lib = write(&root, "lib.rs", "mod ghost;\nuse std::collections::HashMap;\n");

        let deps = find_dependencies(&lib, &root);
        assert!(deps.edges.is_empty());
        let kinds: Vec<&str> = deps.issues.iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec!["unresolved_module", "unresolved_import"]);
    }

    #[test]
    fn test_unreadable_file_has_no_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let deps = find_dependencies(&root.join("missing.rs"), &root);
        assert!(deps.edges.is_empty());
        assert_eq!(deps.issues.len(), 1);
        assert_eq!(deps.issues[0].kind(), "unreadable_source");
    }

    #[cfg(unix)]
    #[test]
    fn test_module_symlinked_outside_root_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let secret = write(&outside.path().canonicalize().unwrap(), "secret.rs", "");

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let lib = write(&root, "lib.rs", "mod leak;\n");
        std::os::unix::fs::symlink(&secret, root.join("leak.rs")).unwrap();

        let deps = find_dependencies(&lib, &root);
        assert!(deps.edges.is_empty());
        assert!(matches!(deps.issues[0], ScanIssue::RootEscape { .. }));
    }

    #[test]
    fn test_relative_display_outside_root_is_full_path() {
        let root = PathBuf::from("/proj");
        assert_eq!(relative_display(Path::new("/proj/src/a.rs"), &root), "src/a.rs");
        assert_eq!(relative_display(Path::new("/elsewhere/b.rs"), &root), "/elsewhere/b.rs");
    }
}
