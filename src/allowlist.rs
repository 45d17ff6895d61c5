//! Loading and validating per-layer allowed-packages files.
//!
//! An allowlist file is a JSON array of package names, e.g.
//! `["@scope/pkg-a", "@scope/pkg-b"]`, referenced from a layer's
//! `allowedPackagesFile` field.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::errors::ConfigError;

/// Load an allowed-packages file from disk and return the set of
/// package names it permits. I/O adapter over
/// [`validate_allowlist_content`].
pub fn load_allowed_packages(
    workspace_root: &Path,
    file_path: &str,
) -> Result<HashSet<String>, ConfigError> {
    let full_path = workspace_root.join(file_path);
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

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: display,
        message: e.to_string(),
    })?;

    validate_allowlist_content(&parsed, file_path)
}

/// Validate that parsed allowlist content is a non-empty array of
/// strings, returning the set of package names.
pub fn validate_allowlist_content(
    parsed: &Value,
    file_path: &str,
) -> Result<HashSet<String>, ConfigError> {
    let items = parsed.as_array().ok_or_else(|| {
        ConfigError::validation(format!(
            "Allowed-packages file \"{}\" must contain a JSON array",
            file_path
        ))
    })?;

    if items.is_empty() {
        return Err(ConfigError::validation(format!(
            "Allowed-packages file \"{}\" must contain at least one package name",
            file_path
        )));
    }

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ConfigError::validation(format!(
                    "Allowed-packages file \"{}\" must contain only strings",
                    file_path
                ))
            })
        })
        .collect()
}
