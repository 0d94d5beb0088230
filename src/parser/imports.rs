use std::fmt;

use tree_sitter::{Node, Tree};

use super::kind::{Navigation, NodeKind, collect_nodes, node_text};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// One segment of a flattened use path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// `crate`
    Crate,
    /// `self`
    SelfModule,
    /// `super`
    Super,
    /// A plain identifier.
    Name(String),
}

impl PathSegment {
    pub fn as_str(&self) -> &str {
        match self {
            PathSegment::Crate => "crate",
            PathSegment::SelfModule => "self",
            PathSegment::Super => "super",
            PathSegment::Name(name) => name,
        }
    }

    pub fn is_navigation(&self) -> bool {
        !matches!(self, PathSegment::Name(_))
    }
}

impl From<Navigation> for PathSegment {
    fn from(nav: Navigation) -> Self {
        match nav {
            Navigation::CrateRoot => PathSegment::Crate,
            Navigation::SelfModule => PathSegment::SelfModule,
            Navigation::ParentModule => PathSegment::Super,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully flattened use path: no groups, no aliases.
///
/// `use a::{b, c::d as e};` yields two entries, `a::b` and `a::c::d`.
/// `use a::b::*;` yields one entry `a::b` with `is_glob = true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UseEntry {
    pub segments: Vec<PathSegment>,
    /// The entry imports a module's contents rather than one named item.
    pub is_glob: bool,
}

impl UseEntry {
    fn item(segments: Vec<PathSegment>) -> Self {
        Self {
            segments,
            is_glob: false,
        }
    }

    fn glob(segments: Vec<PathSegment>) -> Self {
        Self {
            segments,
            is_glob: true,
        }
    }
}

impl fmt::Display for UseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(seg.as_str())?;
        }
        if self.is_glob {
            f.write_str("::*")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Expand a path node (identifier, keyword or scoped identifier) into segments.
///
/// Anything that is not a path contributes nothing (`::` tokens, generics).
fn path_segments(node: Node, source: &[u8]) -> Vec<PathSegment> {
    match NodeKind::of(node) {
        NodeKind::Identifier => vec![PathSegment::Name(node_text(node, source).to_owned())],
        NodeKind::Navigation(nav) => vec![nav.into()],
        NodeKind::ScopedPath => {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .flat_map(|child| path_segments(child, source))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn with_prefix(prefix: &[PathSegment], tail: Vec<PathSegment>) -> Vec<PathSegment> {
    let mut segments = prefix.to_vec();
    segments.extend(tail);
    segments
}

/// Flatten one use-tree node under `prefix` into independent entries.
fn flatten(node: Node, source: &[u8], prefix: &[PathSegment]) -> Vec<UseEntry> {
    match NodeKind::of(node) {
        NodeKind::ImportDeclaration => match node.child_by_field_name("argument") {
            Some(argument) => flatten(argument, source, &[]),
            None => Vec::new(),
        },
        NodeKind::ImportGroup => {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .flat_map(|member| flatten(member, source, prefix))
                .collect()
        }
        NodeKind::ScopedImportGroup => {
            let head = node
                .child_by_field_name("path")
                .map(|p| path_segments(p, source))
                .unwrap_or_default();
            let new_prefix = with_prefix(prefix, head);
            match node.child_by_field_name("list") {
                Some(list) => flatten(list, source, &new_prefix),
                None => vec![UseEntry::item(new_prefix)],
            }
        }
        // `path as alias`: the alias is a local rename only.
        NodeKind::ImportAlias => match node.child_by_field_name("path") {
            Some(path) => flatten(path, source, prefix),
            None => Vec::new(),
        },
        NodeKind::ImportWildcard => {
            let mut cursor = node.walk();
            let path = node
                .children(&mut cursor)
                .find(|c| !matches!(c.kind(), "::" | "*"));
            match path {
                Some(path) => vec![UseEntry::glob(with_prefix(
                    prefix,
                    path_segments(path, source),
                ))],
                None => Vec::new(),
            }
        }
        NodeKind::ScopedPath | NodeKind::Identifier | NodeKind::Navigation(_) => {
            vec![UseEntry::item(with_prefix(prefix, path_segments(node, source)))]
        }
        NodeKind::ModuleDeclaration | NodeKind::Other => Vec::new(),
    }
}

/// Extract every `use` declaration in the tree as flattened [`UseEntry`] values.
///
/// Declarations anywhere in the file are included (function bodies, inline
/// modules). Entries come back in document order, so the same source text
/// always yields the same list regardless of whitespace.
pub fn extract_imports(tree: &Tree, source: &[u8]) -> Vec<UseEntry> {
    collect_nodes(tree, |kind| kind == NodeKind::ImportDeclaration)
        .into_iter()
        .flat_map(|decl| flatten(decl, source, &[]))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
