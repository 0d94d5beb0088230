use std::path::{Path, PathBuf};

use crate::parser::imports::{PathSegment, UseEntry};

/// Extension probed for module files.
pub const SOURCE_EXTENSION: &str = "rs";

/// Outcome of resolving one [`UseEntry`] against the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// Resolved to a canonical file inside the project root.
    Resolved(PathBuf),
    /// The path is only navigation tokens (`use super::*;`, `use crate;`): no new file.
    NoModulePath,
    /// No candidate file exists on disk.
    Unresolved,
    /// A candidate exists but its canonical form lies outside the project root.
    /// Holds the first rejected path.
    OutsideRoot(PathBuf),
}

impl ImportResolution {
    pub fn resolved(self) -> Option<PathBuf> {
        match self {
            ImportResolution::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

/// The two file shapes a module path can take, in precedence order:
/// `<base>/<a>/<b>.rs` then `<base>/<a>/<b>/mod.rs`.
fn file_candidates<S: AsRef<str>>(base: &Path, segments: &[S]) -> Option<[PathBuf; 2]> {
    let (last, parents) = segments.split_last()?;
    let mut dir = base.to_path_buf();
    for seg in parents {
        dir.push(seg.as_ref());
    }
    let last = last.as_ref();
    Some([
        dir.join(format!("{last}.{SOURCE_EXTENSION}")),
        dir.join(last).join(format!("mod.{SOURCE_EXTENSION}")),
    ])
}

/// Canonical form of the first candidate that is an existing file.
fn first_existing(candidates: [PathBuf; 2]) -> Option<PathBuf> {
    candidates
        .into_iter()
        .filter_map(|c| c.canonicalize().ok())
        .find(|c| c.is_file())
}

/// True if the canonical `path` lies under the canonical `project_root`.
pub fn is_within_root(path: &Path, project_root: &Path) -> bool {
    path.starts_with(project_root)
}

/// Resolve a `mod name;` declaration to its file.
///
/// Probes `parent_dir/name.rs` then `parent_dir/name/mod.rs`. A flat file wins
/// when both exist. Returns the canonical path, or `None` if neither exists.
pub fn resolve_module(name: &str, parent_dir: &Path) -> Option<PathBuf> {
    first_existing(file_candidates(parent_dir, &[name])?)
}

/// Consume leading navigation tokens and return the directory they point at,
/// plus the segments that still need filesystem resolution.
///
/// - `crate` jumps to `project_root`
/// - `self` goes back to the directory of `current_file`
/// - `super` climbs one directory, but never above `project_root`
///
/// Consumption stops at the first plain identifier.
pub fn derive_base<'a>(
    segments: &'a [PathSegment],
    current_file: &Path,
    project_root: &Path,
) -> (PathBuf, &'a [PathSegment]) {
    let file_dir = current_file.parent().unwrap_or(project_root).to_path_buf();
    let mut base_dir = file_dir.clone();
    let mut consumed = 0;

    for seg in segments {
        match seg {
            PathSegment::Crate => base_dir = project_root.to_path_buf(),
            PathSegment::SelfModule => base_dir = file_dir.clone(),
            PathSegment::Super => {
                if base_dir != project_root
                    && base_dir.starts_with(project_root)
                    && let Some(parent) = base_dir.parent()
                {
                    base_dir = parent.to_path_buf();
                }
            }
            PathSegment::Name(_) => break,
        }
        consumed += 1;
    }

    (base_dir, &segments[consumed..])
}

/// Segment lists worth probing for a use path, most specific first.
///
/// The second list drops the last segment: `use crate::util::helper;` usually
/// names an item `helper` defined inside `util.rs`, not a file `util/helper.rs`.
/// Globs already name a module, so they get no fallback.
fn candidate_segment_lists(remaining: &[PathSegment], is_glob: bool) -> Vec<&[PathSegment]> {
    let mut lists = vec![remaining];
    if !is_glob && remaining.len() > 1 {
        lists.push(&remaining[..remaining.len() - 1]);
    }
    lists
}

/// Resolve a flattened use path to a file inside `project_root`.
///
/// Each candidate list is an independent attempt: its first existing file is
/// canonicalized and checked against the root. A candidate that escapes the
/// root is rejected outright (its `mod.rs` shape is not tried) and the next
/// candidate list is attempted.
pub fn resolve_use_entry(
    entry: &UseEntry,
    current_file: &Path,
    project_root: &Path,
) -> ImportResolution {
    let (base_dir, remaining) = derive_base(&entry.segments, current_file, project_root);
    if remaining.is_empty() {
        return ImportResolution::NoModulePath;
    }

    let mut escaped: Option<PathBuf> = None;
    for candidate in candidate_segment_lists(remaining, entry.is_glob) {
        let segments: Vec<&str> = candidate.iter().map(PathSegment::as_str).collect();
        let Some(found) = file_candidates(&base_dir, &segments).and_then(first_existing) else {
            continue;
        };
        if is_within_root(&found, project_root) {
            return ImportResolution::Resolved(found);
        }
        escaped.get_or_insert(found);
    }

    match escaped {
        Some(path) => ImportResolution::OutsideRoot(path),
        None => ImportResolution::Unresolved,
    }
}

/// Resolve a flattened use path to a file inside `project_root`, if any.
pub fn resolve_import(
    entry: &UseEntry,
    current_file: &Path,
    project_root: &Path,
) -> Option<PathBuf> {
    resolve_use_entry(entry, current_file, project_root).resolved()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn name(s: &str) -> PathSegment {
        PathSegment::Name(s.to_owned())
    }

    fn entry(path: &str, is_glob: bool) -> UseEntry {
        let segments = path
            .split("::")
            .map(|s| match s {
                "crate" => PathSegment::Crate,
                "self" => PathSegment::SelfModule,
                "super" => PathSegment::Super,
                other => name(other),
            })
            .collect();
        UseEntry { segments, is_glob }
    }

    /// Canonical tempdir root, so `starts_with` comparisons hold on symlinked
    /// temp locations.
    fn canonical_root(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "// fixture\n").unwrap();
        path
    }

    #[test]
    fn test_resolve_module_prefers_flat_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        touch(&root, "src/util.rs");
        touch(&root, "src/util/mod.rs");

        let found = resolve_module("util", &root.join("src")).unwrap();
        assert_eq!(found, root.join("src/util.rs"));
    }

    #[test]
    fn test_resolve_module_falls_back_to_mod_rs() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        touch(&root, "src/risk/mod.rs");

        let found = resolve_module("risk", &root.join("src")).unwrap();
        assert_eq!(found, root.join("src/risk/mod.rs"));
    }

    #[test]
    fn test_resolve_module_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        assert!(resolve_module("ghost", &root).is_none());
    }

    #[test]
    fn test_derive_base_crate_uses_project_root() {
        let root = PathBuf::from("/proj/src");
        let current = root.join("x/y.rs");
        let e = entry("crate::a::b", false);
        let (base, rest) = derive_base(&e.segments, &current, &root);
        assert_eq!(base, root);
        assert_eq!(rest, &[name("a"), name("b")]);
    }

    #[test]
    fn test_derive_base_double_super_climbs_two_levels() {
        let root = PathBuf::from("/proj/src");
        let current = root.join("a/b/file.rs");
        let e = entry("super::super::z", false);
        let (base, rest) = derive_base(&e.segments, &current, &root);
        assert_eq!(base, root);
        assert_eq!(rest, &[name("z")]);
    }

    #[test]
    fn test_derive_base_super_stops_at_root() {
        let root = PathBuf::from("/proj/src");
        let current = root.join("lib.rs");
        let e = entry("super::super::super::z", false);
        let (base, _) = derive_base(&e.segments, &current, &root);
        assert_eq!(base, root, "base_dir must not move above the project root");
    }

    #[test]
    fn test_derive_base_self_resets_to_file_dir() {
        let root = PathBuf::from("/proj");
        let current = root.join("src/net/tcp.rs");
        let e = entry("crate::self::conn", false);
        let (base, rest) = derive_base(&e.segments, &current, &root);
        assert_eq!(base, root.join("src/net"));
        assert_eq!(rest, &[name("conn")]);
    }

    #[test]
    fn test_derive_base_stops_at_first_identifier() {
        let root = PathBuf::from("/proj");
        let current = root.join("src/lib.rs");
        let e = entry("a::super::b", false);
        let (base, rest) = derive_base(&e.segments, &current, &root);
        assert_eq!(base, root.join("src"));
        assert_eq!(rest.len(), 3, "tokens after an identifier are not consumed");
    }

    #[test]
    fn test_navigation_only_resolves_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "src/lib.rs");
        let outcome = resolve_use_entry(&entry("super", true), &current, &root);
        assert_eq!(outcome, ImportResolution::NoModulePath);
    }

    #[test]
    fn test_crate_path_resolves_relative_to_root_not_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir).join("src");
        fs::create_dir_all(&root).unwrap();
        let current = touch(&root, "x/y.rs");
        touch(&root, "a.rs");
        touch(&root, "x/a.rs");

        let found = resolve_import(&entry("crate::a::b", false), &current, &root).unwrap();
        assert_eq!(found, root.join("a.rs"));
    }

    #[test]
    fn test_item_falls_back_to_parent_module_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        touch(&root, "util.rs");

        let found = resolve_import(&entry("crate::util::helper", false), &current, &root);
        assert_eq!(found, Some(root.join("util.rs")));
    }

    #[test]
    fn test_full_path_wins_over_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        touch(&root, "util.rs");
        touch(&root, "util/helper.rs");

        let found = resolve_import(&entry("crate::util::helper", false), &current, &root);
        assert_eq!(found, Some(root.join("util/helper.rs")));
    }

    #[test]
    fn test_glob_never_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        touch(&root, "a.rs");

        // `a/b.rs` and `a/b/mod.rs` are missing; `a.rs` must not be picked.
        let outcome = resolve_use_entry(&entry("a::b", true), &current, &root);
        assert_eq!(outcome, ImportResolution::Unresolved);

        touch(&root, "a/b/mod.rs");
        let found = resolve_import(&entry("a::b", true), &current, &root);
        assert_eq!(found, Some(root.join("a/b/mod.rs")));
    }

    #[test]
    fn test_single_segment_has_no_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        let outcome = resolve_use_entry(&entry("std", false), &current, &root);
        assert_eq!(outcome, ImportResolution::Unresolved);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let outside_root = canonical_root(&outside);
        let secret = touch(&outside_root, "secret.rs");

        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        std::os::unix::fs::symlink(&secret, root.join("leak.rs")).unwrap();

        let outcome = resolve_use_entry(&entry("leak::Item", false), &current, &root);
        assert_eq!(outcome, ImportResolution::OutsideRoot(secret));
    }

    #[cfg(unix)]
    #[test]
    fn test_escaping_candidate_does_not_block_other_candidate() {
        let outside = tempfile::tempdir().unwrap();
        let outside_root = canonical_root(&outside);
        let secret = touch(&outside_root, "secret.rs");

        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let current = touch(&root, "lib.rs");
        touch(&root, "net.rs");
        // Full candidate `net/tcp.rs` escapes; also create `net/tcp/mod.rs`
        // inside the root, which must NOT be tried for the same candidate.
        fs::create_dir_all(root.join("net")).unwrap();
        std::os::unix::fs::symlink(&secret, root.join("net/tcp.rs")).unwrap();
        touch(&root, "net/tcp/mod.rs");

        let found = resolve_import(&entry("net::tcp", false), &current, &root);
        assert_eq!(found, Some(root.join("net.rs")));
    }
}
