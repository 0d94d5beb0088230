pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod graph;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod traverse;

pub use config::{ScoutConfig, Settings, resolve_config_path};
pub use context::build_files_context;
pub use error::{ConfigError, ScanIssue};
pub use traverse::{DependencyReport, include_dependencies, scan_dependencies};
