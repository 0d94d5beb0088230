use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating or loading the `.scout` config.
///
/// These are fatal to a CLI run and are raised before any traversal starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no '.scout' file found under {}", .0.display())]
    NotFound(PathBuf),

    #[error("config file must be named '.scout', got {0:?}")]
    WrongFileName(String),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON inside {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {} must include a non-empty 'contract_type'", .0.display())]
    MissingContractType(PathBuf),
}

/// A non-fatal condition met while expanding the dependency set.
///
/// Each issue degrades the dependency set of one node only; the traversal
/// keeps going. Issues are logged where they occur and collected into the
/// [`DependencyReport`](crate::traverse::DependencyReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanIssue {
    #[error("file listed in config not found: {seed}")]
    UnreadableSeed { seed: String },

    #[error("unable to read {}: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("unable to decode {} as UTF-8", path.display())]
    UndecodableSource { path: PathBuf },

    #[error("unable to resolve module '{name}' declared in {}", declared_in.display())]
    UnresolvedModule { name: String, declared_in: PathBuf },

    #[error("unable to resolve use path '{path}' from {}", declared_in.display())]
    UnresolvedImport { path: String, declared_in: PathBuf },

    #[error(
        "'{reference}' from {} resolves outside the target root ({}); skipping",
        declared_in.display(),
        resolved.display()
    )]
    RootEscape {
        reference: String,
        declared_in: PathBuf,
        resolved: PathBuf,
    },
}

impl ScanIssue {
    /// Short machine-readable tag used by the JSON report.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanIssue::UnreadableSeed { .. } => "unreadable_seed",
            ScanIssue::UnreadableSource { .. } => "unreadable_source",
            ScanIssue::UndecodableSource { .. } => "undecodable_source",
            ScanIssue::UnresolvedModule { .. } => "unresolved_module",
            ScanIssue::UnresolvedImport { .. } => "unresolved_import",
            ScanIssue::RootEscape { .. } => "root_escape",
        }
    }
}
