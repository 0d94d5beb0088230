pub mod imports;
pub mod kind;
pub mod modules;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tree_sitter::{Parser, Tree};

use crate::error::ScanIssue;

use imports::{UseEntry, extract_imports};
use modules::extract_modules;

// One Rust parser per thread, initialised lazily on first use.
thread_local! {
    static PARSER_RS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_rust::LANGUAGE.into())
            .expect("tree-sitter-rust grammar is ABI compatible");
        p
    });
}

/// Parse Rust source bytes into a tree-sitter syntax tree.
///
/// Syntax errors do not fail the parse: tree-sitter produces a tree with
/// `ERROR` nodes and extraction simply sees fewer constructs.
///
/// # Errors
/// Returns an error only if tree-sitter returns `None`.
pub fn parse_source(source: &[u8]) -> Result<Tree> {
    PARSER_RS
        .with(|p| p.borrow_mut().parse(source, None))
        .ok_or_else(|| anyhow!("tree-sitter returned None"))
}

/// A source file read from disk. Identity is the canonical path.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    /// Read and UTF-8 decode `path`, canonicalizing it first.
    pub fn read(path: &Path) -> Result<Self, ScanIssue> {
        let unreadable = |reason: String| ScanIssue::UnreadableSource {
            path: path.to_path_buf(),
            reason,
        };

        let canonical = path.canonicalize().map_err(|e| unreadable(e.to_string()))?;
        let bytes = std::fs::read(&canonical).map_err(|e| unreadable(e.to_string()))?;
        let content = String::from_utf8(bytes).map_err(|_| ScanIssue::UndecodableSource {
            path: canonical.clone(),
        })?;

        Ok(Self {
            path: canonical,
            content,
        })
    }
}

/// Everything the resolver needs from one file: declared modules and use entries.
///
/// The syntax tree is NOT retained; it is dropped as soon as both lists are built.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileScan {
    pub modules: Vec<String>,
    pub imports: Vec<UseEntry>,
}

impl FileScan {
    /// Extract modules and use entries from already-loaded source text.
    pub fn from_source(source: &str) -> Result<Self> {
        let bytes = source.as_bytes();
        let tree = parse_source(bytes)?;
        Ok(Self {
            modules: extract_modules(&tree, bytes),
            imports: extract_imports(&tree, bytes),
        })
    }
}

/// Read, parse and extract one file.
///
/// Read and decode failures come back as a [`ScanIssue`]; callers treat them
/// as "this file declares nothing". A parser failure is logged and yields an
/// empty scan.
pub fn scan_file(path: &Path) -> Result<FileScan, ScanIssue> {
    let file = SourceFile::read(path)?;
    match FileScan::from_source(&file.content) {
        Ok(scan) => Ok(scan),
        Err(err) => {
            tracing::warn!(file = %file.path.display(), "failed to parse: {err}");
            Ok(FileScan::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_source_collects_modules_and_uses() {
        let scan = FileScan::from_source("mod util;\nuse crate::util::helper;\n").unwrap();
        assert_eq!(scan.modules, vec!["util".to_string()]);
        assert_eq!(scan.imports.len(), 1);
        assert_eq!(scan.imports[0].to_string(), "crate::util::helper");
    }

    #[test]
    fn test_malformed_source_still_parses() {
        let scan = FileScan::from_source("fn broken( { struct }}}\nmod ok;\n").unwrap();
        // Recovery is grammar dependent; the call itself must not fail.
        assert!(scan.modules.len() <= 1);
    }

    #[test]
    fn test_scan_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_file(&dir.path().join("nope.rs")).unwrap_err();
        assert!(matches!(err, ScanIssue::UnreadableSource { .. }));
    }

    #[test]
    fn test_scan_non_utf8_file_is_undecodable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.rs");
        fs::write(&path, [0x6d, 0x6f, 0x64, 0x20, 0xff, 0xfe, 0x3b]).unwrap();
        let err = scan_file(&path).unwrap_err();
        assert!(matches!(err, ScanIssue::UndecodableSource { .. }));
    }

    #[test]
    fn test_scan_file_canonicalizes_and_extracts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "pub mod a;\nmod b;\n").unwrap();
        let scan = scan_file(&dir.path().join("src/../src/lib.rs")).unwrap();
        assert_eq!(scan.modules, vec!["a".to_string(), "b".to_string()]);
    }
}
