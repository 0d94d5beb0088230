use std::path::Path;

use tracing::{info, warn};

use crate::resolver::relative_display;

/// Concatenate the listed files into one text block for model input.
///
/// Each file becomes a chunk headed by `// File: <path>`; chunks are separated
/// by a blank line. Files that are missing or not UTF-8 get a one-line marker
/// in place of their content.
pub fn build_files_context<S: AsRef<str>>(file_paths: &[S], root: &Path) -> String {
    if file_paths.is_empty() {
        return "No files listed in config.".to_string();
    }

    info!("Building files context for {} files.", file_paths.len());
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let chunks: Vec<String> = file_paths
        .iter()
        .map(|relative| file_chunk(relative.as_ref(), &root))
        .collect();

    chunks.join("\n\n")
}

fn file_chunk(relative: &str, root: &Path) -> String {
    let Ok(resolved) = root.join(relative).canonicalize() else {
        warn!("File listed in config not found: {relative}");
        return format!("// File not found: {relative}");
    };

    let bytes = match std::fs::read(&resolved) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Unable to read {relative}: {err}");
            return format!("// File not found: {relative}");
        }
    };

    match String::from_utf8(bytes) {
        Ok(content) => format!(
            "// File: {}\n{}\n",
            relative_display(&resolved, root),
            content.trim()
        ),
        Err(_) => {
            warn!("Unable to decode file as UTF-8: {relative}");
            format!("// Unable to decode file as UTF-8: {relative}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let none: [&str; 0] = [];
        assert_eq!(build_files_context(&none, dir.path()), "No files listed in config.");
    }

    #[test]
    fn test_chunks_in_order_with_markers() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "\n\nmod util;\n\n").unwrap();
        fs::write(dir.path().join("src/blob.rs"), [0xffu8, 0xfe, 0x00]).unwrap();

        let ctx = build_files_context(
            &["src/lib.rs", "src/missing.rs", "src/blob.rs"],
            dir.path(),
        );
        assert_eq!(
            ctx,
            "// File: src/lib.rs\nmod util;\n\n\n\
             // File not found: src/missing.rs\n\n\
             // Unable to decode file as UTF-8: src/blob.rs"
        );
    }
}
