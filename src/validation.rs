//! The validation engine: classifies packages and dependency edges
//! against layer rules.
//!
//! Rules run in a strict precedence order per package. Rules 1-3
//! short-circuit (a package failing one is not checked against the
//! rest); rule 4 checks every dependency edge and may emit several
//! violations for one package. The engine is pure: no I/O, no error
//! path, no shared state between invocations.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::messages;
use crate::package::Package;
use crate::rules::{
    has_required_layer, is_dependency_allowed, is_known_layer, is_package_allowed_in_layer,
};

/// Mapping from layer name to its resolved set of permitted package
/// names. A layer absent from the index is unrestricted.
pub type AllowedPackagesIndex = HashMap<String, HashSet<String>>;

/// Kinds of rule-check failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationType {
    MissingLayer,
    UnknownLayer,
    UnauthorizedLayerMember,
    InvalidDependency,
}

impl ViolationType {
    /// Human-readable label used by the console formatter.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationType::MissingLayer => "Missing Layer",
            ViolationType::UnknownLayer => "Unknown Layer",
            ViolationType::UnauthorizedLayerMember => "Unauthorized Layer Member",
            ViolationType::InvalidDependency => "Invalid Dependency",
        }
    }
}

/// Structured context attached to violations that have meaningful
/// machine-readable detail (invalid-dependency and
/// unauthorized-layer-member).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_layers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_packages_source: Option<String>,
}

/// One rule-check failure tied to a specific package (and, for
/// dependency violations, a specific dependency edge). Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub package: String,
    /// Short, single-line summary.
    pub message: String,
    /// Multi-line message with remediation guidance and the package's
    /// location. Always strictly longer than `message`.
    pub detailed_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ViolationDetails>,
}

/// Validate all packages against the resolved layer configuration.
///
/// Violations come back in package-iteration order, with dependency
/// violations for a given package in its dependency-iteration order.
pub fn validate_packages(
    packages: &[Package],
    config: &ResolvedConfig,
    allowed_packages_by_layer: &AllowedPackagesIndex,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let package_index: HashMap<&str, &Package> =
        packages.iter().map(|pkg| (pkg.name.as_str(), pkg)).collect();

    for pkg in packages {
        // Rule 1: the package must declare a layer.
        if !has_required_layer(pkg) {
            violations.push(Violation {
                kind: ViolationType::MissingLayer,
                package: pkg.name.clone(),
                message: format!(
                    "Package \"{}\" is missing the required \"layer\" field in package.json",
                    pkg.name
                ),
                detailed_message: messages::missing_layer(&pkg.name, &pkg.path),
                details: None,
            });
            continue;
        }

        let layer = pkg.layer.as_deref().unwrap_or_default();

        // Rule 2: the declared layer must be defined in the config.
        if !is_known_layer(layer, &config.layers) {
            let valid_layers = config
                .layers
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            violations.push(Violation {
                kind: ViolationType::UnknownLayer,
                package: pkg.name.clone(),
                message: format!(
                    "Package \"{}\" has unknown layer \"{}\". Valid layers: {}",
                    pkg.name, layer, valid_layers
                ),
                detailed_message: messages::unknown_layer(
                    &pkg.name,
                    &pkg.path,
                    layer,
                    &valid_layers,
                ),
                details: None,
            });
            continue;
        }

        let layer_def = &config.layers[layer];

        // Rule 3: the package must be a permitted member of its layer.
        // An unauthorized package gets no dependency checks.
        let restriction = allowed_packages_by_layer.get(layer);
        if !is_package_allowed_in_layer(&pkg.name, restriction) {
            let source = layer_def
                .allowed_packages_file
                .clone()
                .unwrap_or_else(|| "allowedPackages in config".to_string());
            violations.push(Violation {
                kind: ViolationType::UnauthorizedLayerMember,
                package: pkg.name.clone(),
                message: format!(
                    "Package \"{}\" is not an allowed member of layer \"{}\"",
                    pkg.name, layer
                ),
                detailed_message: messages::unauthorized_member(
                    &pkg.name, &pkg.path, layer, &source,
                ),
                details: Some(ViolationDetails {
                    from_layer: Some(layer.to_string()),
                    allowed_packages_source: Some(source),
                    ..Default::default()
                }),
            });
            continue;
        }

        // Rule 4: every dependency edge must target an allowed layer.
        // Undiscovered or layer-less targets are not this engine's
        // concern and are skipped.
        for dep_name in &pkg.dependencies {
            let dep_pkg = match package_index.get(dep_name.as_str()) {
                Some(dep_pkg) => dep_pkg,
                None => continue,
            };
            let dep_layer = match dep_pkg.layer.as_deref() {
                Some(dep_layer) if !dep_layer.is_empty() => dep_layer,
                _ => continue,
            };

            if !is_dependency_allowed(layer, dep_layer, &layer_def.allowed_dependencies) {
                violations.push(Violation {
                    kind: ViolationType::InvalidDependency,
                    package: pkg.name.clone(),
                    message: format!(
                        "Layer violation: \"{}\" ({}) cannot depend on \"{}\" ({})",
                        pkg.name, layer, dep_pkg.name, dep_layer
                    ),
                    detailed_message: messages::invalid_dependency(
                        &pkg.name,
                        &pkg.path,
                        layer,
                        &dep_pkg.name,
                        dep_layer,
                        &layer_def.allowed_dependencies,
                    ),
                    details: Some(ViolationDetails {
                        from_layer: Some(layer.to_string()),
                        to_package: Some(dep_pkg.name.clone()),
                        to_layer: Some(dep_layer.to_string()),
                        allowed_layers: Some(layer_def.allowed_dependencies.clone()),
                        ..Default::default()
                    }),
                });
            }
        }
    }

    violations
}
