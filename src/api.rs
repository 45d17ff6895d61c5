//! High-level enforcement pipeline: config resolution, discovery,
//! allowlist resolution, and validation in one call.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::allowlist::load_allowed_packages;
use crate::config::{
    apply_defaults, load_config_from_file, EnforcementMode, LayerConfig, ResolvedConfig,
    DEFAULT_CONFIG_FILENAME,
};
use crate::discovery::{discover_packages, DiscoveryWarning};
use crate::errors::LayerError;
use crate::package::Package;
use crate::validation::{validate_packages, AllowedPackagesIndex, Violation};

/// Options for [`validate_layers`].
#[derive(Debug, Clone, Default)]
pub struct ValidateLayersOptions {
    /// Workspace root directory. Defaults to the current directory.
    pub workspace_root: Option<PathBuf>,
    /// Path to the config file, relative to the workspace root.
    /// Defaults to `stratify.config.json`.
    pub config_path: Option<PathBuf>,
    /// Pre-built validated configuration, skipping file loading and
    /// schema validation entirely.
    pub config: Option<LayerConfig>,
    /// Override the enforcement mode from the config.
    pub mode: Option<EnforcementMode>,
}

/// Everything a run produced: resolved config, discovered packages,
/// non-fatal warnings, and the violations found.
#[derive(Debug, Clone)]
pub struct EnforcementOutcome {
    pub config: ResolvedConfig,
    pub packages: Vec<Package>,
    pub warnings: Vec<DiscoveryWarning>,
    pub violations: Vec<Violation>,
    pub total_packages: usize,
    /// Wall-clock milliseconds for the whole run.
    pub duration: f64,
}

/// Validate monorepo packages against architectural layer rules.
///
/// Resolves the configuration (from `options.config` or from the
/// config file), applies any mode override, short-circuits entirely
/// when the effective mode is `off`, then discovers packages, resolves
/// membership allowlists, and runs the validation engine.
pub fn validate_layers(options: &ValidateLayersOptions) -> Result<EnforcementOutcome, LayerError> {
    let start = Instant::now();

    let workspace_root = options
        .workspace_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match &options.config {
        Some(config) => apply_defaults(config.clone()),
        None => {
            let config_path = options
                .config_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
            load_config_from_file(&workspace_root, &config_path)?
        }
    };

    if let Some(mode) = options.mode {
        config.enforcement.mode = mode;
    }

    // Enforcement off skips discovery and validation entirely.
    if config.enforcement.mode == EnforcementMode::Off {
        return Ok(EnforcementOutcome {
            config,
            packages: vec![],
            warnings: vec![],
            violations: vec![],
            total_packages: 0,
            duration: elapsed_ms(start),
        });
    }

    let discovered = discover_packages(&workspace_root, &config.workspaces)?;
    let allowed_packages_by_layer = resolve_allowed_packages(&config, &workspace_root)?;

    let violations = validate_packages(&discovered.packages, &config, &allowed_packages_by_layer);

    let total_packages = discovered.packages.len();
    Ok(EnforcementOutcome {
        config,
        packages: discovered.packages,
        warnings: discovered.warnings,
        violations,
        total_packages,
        duration: elapsed_ms(start),
    })
}

/// Resolve membership allowlists for every layer that restricts its
/// members, either inline or from a referenced file. Layers without
/// restrictions stay absent from the index.
fn resolve_allowed_packages(
    config: &ResolvedConfig,
    workspace_root: &Path,
) -> Result<AllowedPackagesIndex, LayerError> {
    let mut index = AllowedPackagesIndex::new();

    for (layer_name, layer_def) in &config.layers {
        if let Some(allowed) = &layer_def.allowed_packages {
            index.insert(layer_name.clone(), allowed.iter().cloned().collect());
        } else if let Some(file_path) = &layer_def.allowed_packages_file {
            let allowed = load_allowed_packages(workspace_root, file_path)?;
            index.insert(layer_name.clone(), allowed);
        }
    }

    Ok(index)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
