//! Schema validation for raw configuration JSON.
//!
//! Top-level structural problems fail fast; per-layer problems are
//! accumulated so a user sees every broken layer definition in one
//! pass.

use serde_json::Value;

use super::{
    EnforcementMode, LayerConfig, LayerDefinition, LayerMap, PartialEnforcementConfig,
    PartialWorkspaceConfig,
};
use crate::errors::ConfigError;

/// Validate that a raw parsed JSON value conforms to the config schema.
/// Returns the validated (but not yet defaulted) configuration.
pub fn validate_config_schema(raw: &Value) -> Result<LayerConfig, ConfigError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ConfigError::validation("Config must be a JSON object"))?;

    let raw_layers = obj
        .get("layers")
        .and_then(Value::as_object)
        .ok_or_else(|| ConfigError::validation("Config must have a \"layers\" object"))?;

    let mut layers = LayerMap::new();
    let mut errors: Vec<String> = Vec::new();

    for (layer_name, layer_def) in raw_layers {
        match validate_layer_definition(layer_name, layer_def) {
            Ok(def) => {
                layers.insert(layer_name.clone(), def);
            }
            Err(message) => errors.push(message),
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::Validation {
            message: "Invalid layer definitions".to_string(),
            details: errors,
        });
    }

    let enforcement = match obj.get("enforcement") {
        None => None,
        Some(value) => Some(validate_enforcement(value)?),
    };

    let workspaces = match obj.get("workspaces") {
        None => None,
        Some(value) => Some(validate_workspaces(value)?),
    };

    Ok(LayerConfig {
        layers,
        workspaces,
        enforcement,
    })
}

/// Validate a single layer definition, returning a message describing
/// the first defect found. Messages are collected per layer by the
/// caller, so one message per broken layer is enough.
pub fn validate_layer_definition(name: &str, raw: &Value) -> Result<LayerDefinition, String> {
    let def = raw
        .as_object()
        .ok_or_else(|| format!("Layer \"{}\" must be an object", name))?;

    let raw_deps = def
        .get("allowedDependencies")
        .and_then(Value::as_array)
        .ok_or_else(|| format!("Layer \"{}\" must have an \"allowedDependencies\" array", name))?;

    let allowed_dependencies = string_elements(raw_deps)
        .ok_or_else(|| format!("Layer \"{}\" allowedDependencies must contain only strings", name))?;

    let allowed_packages = match def.get("allowedPackages") {
        None => None,
        Some(value) => {
            let names = value
                .as_array()
                .filter(|a| !a.is_empty())
                .and_then(|a| string_elements(a))
                .ok_or_else(|| {
                    format!(
                        "Layer \"{}\" allowedPackages must be a non-empty array of strings",
                        name
                    )
                })?;
            Some(names)
        }
    };

    let allowed_packages_file = match def.get("allowedPackagesFile") {
        None => None,
        Some(value) => {
            let path = value
                .as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    format!(
                        "Layer \"{}\" allowedPackagesFile must be a non-empty string",
                        name
                    )
                })?;
            Some(path.to_string())
        }
    };

    if allowed_packages.is_some() && allowed_packages_file.is_some() {
        return Err(format!(
            "Layer \"{}\" cannot set both allowedPackages and allowedPackagesFile",
            name
        ));
    }

    Ok(LayerDefinition {
        description: def
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        allowed_dependencies,
        allowed_packages,
        allowed_packages_file,
    })
}

fn validate_enforcement(raw: &Value) -> Result<PartialEnforcementConfig, ConfigError> {
    let obj = raw.as_object().ok_or_else(|| {
        ConfigError::validation("\"enforcement\" field must be an object if defined")
    })?;

    let mode = match obj.get("mode") {
        None => None,
        Some(value) => Some(parse_mode(value)?),
    };

    Ok(PartialEnforcementConfig { mode })
}

fn parse_mode(value: &Value) -> Result<EnforcementMode, ConfigError> {
    let invalid = || {
        ConfigError::validation(format!(
            "Invalid enforcement mode: {}. Must be \"error\", \"warn\", or \"off\"",
            render_value(value)
        ))
    };

    match value.as_str() {
        Some("error") => Ok(EnforcementMode::Error),
        Some("warn") => Ok(EnforcementMode::Warn),
        Some("off") => Ok(EnforcementMode::Off),
        _ => Err(invalid()),
    }
}

fn validate_workspaces(raw: &Value) -> Result<PartialWorkspaceConfig, ConfigError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ConfigError::validation("\"workspaces\" must be an object"))?;

    let mut partial = PartialWorkspaceConfig::default();
    for (field, slot) in [
        ("patterns", &mut partial.patterns),
        ("protocols", &mut partial.protocols),
        ("ignore", &mut partial.ignore),
    ] {
        if let Some(value) = obj.get(field) {
            let strings = value.as_array().and_then(|a| string_elements(a)).ok_or_else(
                || {
                    ConfigError::validation(format!(
                        "\"workspaces.{}\" must be an array of strings",
                        field
                    ))
                },
            )?;
            *slot = Some(strings);
        }
    }

    Ok(partial)
}

/// All-strings conversion of a JSON array, or `None` if any element is
/// not a string.
fn string_elements(values: &[Value]) -> Option<Vec<String>> {
    values
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Quote strings, render anything else as raw JSON, for error messages
/// that must show the offending value.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
