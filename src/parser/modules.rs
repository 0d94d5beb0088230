use tree_sitter::Tree;

use super::kind::{NodeKind, collect_nodes, node_text};

/// Extract every file-backed `mod foo;` declaration from a parse tree.
///
/// Walks the whole tree, so declarations nested inside inline `mod outer { .. }`
/// blocks are found too. Inline modules themselves are skipped (their body is
/// right here, not in another file). Names come back in document order.
pub fn extract_modules(tree: &Tree, source: &[u8]) -> Vec<String> {
    collect_nodes(tree, |kind| kind == NodeKind::ModuleDeclaration)
        .into_iter()
        .filter_map(|node| node.child_by_field_name("name"))
        .map(|name| node_text(name, source).to_owned())
        .filter(|name| !name.is_empty())
        .collect()
}
