//! Configuration types and file loading for stratify.
//!
//! A configuration moves through three shapes: the raw JSON read from
//! disk, a validated [`LayerConfig`] (optional sections still absent),
//! and the [`ResolvedConfig`] the validation engine consumes, which is
//! always fully populated after [`defaults::apply_defaults`] runs.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub mod defaults;
pub mod schema;

pub use defaults::{apply_defaults, DEFAULT_CONFIG_FILENAME};
pub use schema::validate_config_schema;

/// One layer's rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    /// Free-form description, diagnostic text only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Layer names packages in this layer may depend on. The literal
    /// token `*` permits any layer.
    pub allowed_dependencies: Vec<String>,
    /// Inline list of package names permitted to claim this layer.
    /// Mutually exclusive with `allowed_packages_file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_packages: Option<Vec<String>>,
    /// Path (relative to the workspace root) of a JSON file listing the
    /// permitted package names. Mutually exclusive with `allowed_packages`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_packages_file: Option<String>,
}

/// Map from layer name to definition. Insertion order of the source
/// configuration is preserved so diagnostics that enumerate layers are
/// reproducible.
pub type LayerMap = IndexMap<String, LayerDefinition>;

/// Run-wide severity for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// Violations fail the run.
    Error,
    /// Violations are reported but do not fail the run.
    Warn,
    /// Validation is skipped entirely.
    Off,
}

impl std::fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnforcementMode::Error => write!(f, "error"),
            EnforcementMode::Warn => write!(f, "warn"),
            EnforcementMode::Off => write!(f, "off"),
        }
    }
}

/// Enforcement section of a resolved config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementConfig {
    pub mode: EnforcementMode,
}

/// Workspace discovery section of a resolved config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Glob patterns locating package directories.
    pub patterns: Vec<String>,
    /// Version-string prefixes that mark internal dependencies.
    pub protocols: Vec<String>,
    /// Glob patterns excluded from discovery.
    pub ignore: Vec<String>,
}

/// Enforcement section as written by the user, all fields optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialEnforcementConfig {
    pub mode: Option<EnforcementMode>,
}

/// Workspace section as written by the user, all fields optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialWorkspaceConfig {
    pub patterns: Option<Vec<String>>,
    pub protocols: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
}

/// A configuration that passed schema validation but has not had
/// defaults applied yet. Optional sections stay absent here; only
/// [`defaults::apply_defaults`] fills them in.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub layers: LayerMap,
    pub workspaces: Option<PartialWorkspaceConfig>,
    pub enforcement: Option<PartialEnforcementConfig>,
}

/// A fully resolved configuration. Every field is populated; this is
/// the only shape the validation engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub layers: LayerMap,
    pub workspaces: WorkspaceConfig,
    pub enforcement: EnforcementConfig,
}

/// Load a layer config file from disk, validate it, and apply defaults.
/// I/O adapter over the pure schema validator and default resolver.
pub fn load_config_from_file(
    workspace_root: &Path,
    config_path: &Path,
) -> Result<ResolvedConfig, ConfigError> {
    let full_path = workspace_root.join(config_path);
    let display = full_path.display().to_string();

    let content = match fs::read_to_string(&full_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound { path: display });
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: display,
                message: e.to_string(),
            });
        }
    };

    let raw: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: display,
            message: e.to_string(),
        })?;

    let validated = validate_config_schema(&raw)?;
    Ok(apply_defaults(validated))
}
