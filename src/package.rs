//! Workspace package model and package.json parsing.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::DiscoveryError;

/// A discovered monorepo package. Built once by discovery from a
/// package.json file and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    /// Package name from package.json (unique within the workspace).
    pub name: String,
    /// Declared architectural layer, if any. `None` or an empty string
    /// both count as unassigned.
    pub layer: Option<String>,
    /// Names of internal (workspace-protocol) dependencies, in
    /// declaration order. Deduplication is not guaranteed here.
    pub dependencies: Vec<String>,
    /// Path of the package.json relative to the workspace root, used
    /// only for diagnostics.
    pub path: String,
}

/// Parse a raw package.json value into a [`Package`].
///
/// `protocols` is the list of version-string prefixes that mark a
/// dependency as internal to the workspace (e.g. `workspace:`).
pub fn parse_package_json(
    content: &Value,
    relative_path: &str,
    protocols: &[String],
) -> Result<Package, DiscoveryError> {
    let obj = match content.as_object() {
        Some(obj) => obj,
        None => {
            return Err(DiscoveryError::PackageParseError {
                path: relative_path.to_string(),
                message: format!(
                    "Invalid package.json at \"{}\": must be a JSON object",
                    relative_path
                ),
            });
        }
    };

    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            return Err(DiscoveryError::PackageParseError {
                path: relative_path.to_string(),
                message: format!(
                    "Invalid package.json at \"{}\": missing or invalid \"name\" field",
                    relative_path
                ),
            });
        }
    };

    let layer = obj
        .get("layer")
        .and_then(Value::as_str)
        .map(str::to_string);

    let dependencies = extract_internal_dependencies(
        obj.get("dependencies"),
        obj.get("devDependencies"),
        obj.get("peerDependencies"),
        protocols,
    );

    Ok(Package {
        name,
        layer,
        dependencies,
        path: relative_path.to_string(),
    })
}

/// Extract internal dependency names from the dependency sections of a
/// package.json. Later sections override earlier ones on a name
/// collision (dependencies < devDependencies < peerDependencies), and a
/// dependency counts as internal when its version string starts with
/// any of the configured protocol prefixes.
pub fn extract_internal_dependencies(
    dependencies: Option<&Value>,
    dev_dependencies: Option<&Value>,
    peer_dependencies: Option<&Value>,
    protocols: &[String],
) -> Vec<String> {
    let mut merged: IndexMap<String, String> = IndexMap::new();

    for section in [dependencies, dev_dependencies, peer_dependencies]
        .into_iter()
        .flatten()
    {
        if let Some(map) = section.as_object() {
            for (name, version) in map {
                if let Some(version) = version.as_str() {
                    merged.insert(name.clone(), version.to_string());
                }
            }
        }
    }

    merged
        .into_iter()
        .filter(|(_, version)| protocols.iter().any(|p| version.starts_with(p.as_str())))
        .map(|(name, _)| name)
        .collect()
}
