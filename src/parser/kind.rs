use tree_sitter::{Node, Tree};

/// The three path-navigation keywords that can lead a use path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// `crate`
    CrateRoot,
    /// `self`
    SelfModule,
    /// `super`
    ParentModule,
}

/// The node kinds the extractors care about, tagged once per node.
///
/// Everything else in the Rust grammar collapses to [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `mod foo;` (a `mod_item` without a body). Inline `mod foo { .. }` is `Other`.
    ModuleDeclaration,
    /// `use ...;`
    ImportDeclaration,
    /// `{a, b::c}`
    ImportGroup,
    /// `prefix::{a, b::c}`
    ScopedImportGroup,
    /// `path as alias`
    ImportAlias,
    /// `path::*`
    ImportWildcard,
    /// `a::b::c`
    ScopedPath,
    Identifier,
    Navigation(Navigation),
    Other,
}

impl NodeKind {
    pub fn of(node: Node) -> Self {
        match node.kind() {
            "mod_item" if node.child_by_field_name("body").is_none() => NodeKind::ModuleDeclaration,
            "use_declaration" => NodeKind::ImportDeclaration,
            "use_list" => NodeKind::ImportGroup,
            "scoped_use_list" => NodeKind::ScopedImportGroup,
            "use_as_clause" => NodeKind::ImportAlias,
            "use_wildcard" => NodeKind::ImportWildcard,
            "scoped_identifier" => NodeKind::ScopedPath,
            "identifier" => NodeKind::Identifier,
            "crate" => NodeKind::Navigation(Navigation::CrateRoot),
            "self" => NodeKind::Navigation(Navigation::SelfModule),
            "super" => NodeKind::Navigation(Navigation::ParentModule),
            _ => NodeKind::Other,
        }
    }
}

/// Collect, in document order, every node whose kind satisfies `wanted`.
///
/// A matched node's subtree is not searched further.
pub fn collect_nodes<'t>(tree: &'t Tree, wanted: impl Fn(NodeKind) -> bool) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        let matched = wanted(NodeKind::of(node));
        if matched {
            found.push(node);
        }

        if !matched && cursor.goto_first_child() {
            continue;
        }

        // Climb until a sibling exists; reaching the root again ends the walk.
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}

pub fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
