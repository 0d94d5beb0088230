use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Name of the per-project seed list.
pub const CONFIG_FILENAME: &str = ".scout";

/// Name of the optional settings file at the project root.
pub const SETTINGS_FILENAME: &str = "scout-deps.toml";

/// The `.scout` file: which files to analyse and what kind of contract they form.
///
/// The file is JSON. Keys other than `contract_type` and `files` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Seed files, relative to the target root. Numbers and booleans are
    /// taken as their text form; `null`, arrays and objects are rejected.
    #[serde(default, deserialize_with = "seed_list")]
    pub files: Vec<String>,
}

fn seed_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(de::Error::custom(format!(
                "entries in 'files' must be strings, got {other}"
            ))),
        })
        .collect()
}

impl ScoutConfig {
    /// Load and validate a `.scout` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;

        if config.contract_type().is_none() {
            return Err(ConfigError::MissingContractType(path.to_path_buf()));
        }

        Ok(config)
    }

    pub fn contract_type(&self) -> Option<&str> {
        self.contract_type.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Locate the `.scout` file.
///
/// `override_path` may be a directory to search, or the `.scout` file itself.
/// Without an override, the target root is searched.
pub fn resolve_config_path(
    target_root: &Path,
    override_path: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let search_root = override_path.unwrap_or(target_root);
    let search_root = search_root
        .canonicalize()
        .unwrap_or_else(|_| search_root.to_path_buf());
    debug!(
        "Resolving config path. target_root={} override={:?}",
        target_root.display(),
        override_path
    );

    let is_config_name = search_root
        .file_name()
        .is_some_and(|n| n == CONFIG_FILENAME);

    if search_root.is_file() && !is_config_name {
        let name = search_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ConfigError::WrongFileName(name));
    }

    let candidate = if is_config_name {
        search_root
    } else {
        search_root.join(CONFIG_FILENAME)
    };

    if !candidate.exists() {
        let searched = candidate.parent().unwrap_or(&candidate).to_path_buf();
        return Err(ConfigError::NotFound(searched));
    }

    info!("Using config file at {}", candidate.display());
    Ok(candidate)
}

/// Optional defaults loaded from `scout-deps.toml` at the target root.
///
/// ```toml
/// [dependencies]
/// include = true
/// depth = 2
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dependencies: DependencySettings,
}

#[derive(Debug, Deserialize)]
pub struct DependencySettings {
    /// Expand the seed list with local dependencies by default.
    #[serde(default)]
    pub include: bool,
    /// Default traversal depth.
    #[serde(default = "default_depth")]
    pub depth: i64,
}

fn default_depth() -> i64 {
    1
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self {
            include: false,
            depth: default_depth(),
        }
    }
}

impl Settings {
    /// Load `scout-deps.toml` from `root`.
    ///
    /// Returns defaults if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let settings_path = root.join(SETTINGS_FILENAME);

        if !settings_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&settings_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("failed to parse {SETTINGS_FILENAME}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read {SETTINGS_FILENAME}: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}
