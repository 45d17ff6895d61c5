//! Default values and the default resolver.
//!
//! The constants here are the single source of truth for every built-in
//! default; both the resolver and the discovery adapter read them from
//! this module rather than repeating the literals.

use super::{
    EnforcementConfig, EnforcementMode, LayerConfig, ResolvedConfig, WorkspaceConfig,
};

/// Default enforcement mode when the config does not set one.
pub const DEFAULT_MODE: EnforcementMode = EnforcementMode::Warn;

/// Default glob patterns for locating packages within the monorepo.
pub const DEFAULT_PATTERNS: &[&str] = &["packages/**/*"];

/// Default version-string prefixes that identify internal dependencies.
pub const DEFAULT_PROTOCOLS: &[&str] = &["workspace:"];

/// Default glob patterns excluded from package discovery.
pub const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**", "**/lib/**", "**/dist/**"];

/// Default config filename looked up in the workspace root.
pub const DEFAULT_CONFIG_FILENAME: &str = "stratify.config.json";

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Apply defaults to a validated [`LayerConfig`], producing a fully
/// resolved config. Pure field-level merge: any field the input provides
/// wins, every absent field takes its default. Always succeeds.
pub fn apply_defaults(config: LayerConfig) -> ResolvedConfig {
    let workspaces = config.workspaces.unwrap_or_default();
    let enforcement = config.enforcement.unwrap_or_default();

    ResolvedConfig {
        layers: config.layers,
        workspaces: WorkspaceConfig {
            patterns: workspaces
                .patterns
                .unwrap_or_else(|| to_strings(DEFAULT_PATTERNS)),
            protocols: workspaces
                .protocols
                .unwrap_or_else(|| to_strings(DEFAULT_PROTOCOLS)),
            ignore: workspaces
                .ignore
                .unwrap_or_else(|| to_strings(DEFAULT_IGNORE)),
        },
        enforcement: EnforcementConfig {
            mode: enforcement.mode.unwrap_or(DEFAULT_MODE),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayerDefinition, LayerMap, PartialEnforcementConfig, PartialWorkspaceConfig};

    fn single_layer_config() -> LayerConfig {
        let mut layers = LayerMap::new();
        layers.insert(
            "core".to_string(),
            LayerDefinition {
                description: None,
                allowed_dependencies: vec![],
                allowed_packages: None,
                allowed_packages_file: None,
            },
        );
        LayerConfig {
            layers,
            workspaces: None,
            enforcement: None,
        }
    }

    #[test]
    fn test_all_defaults_applied() {
        let resolved = apply_defaults(single_layer_config());
        assert_eq!(resolved.enforcement.mode, EnforcementMode::Warn);
        assert_eq!(resolved.workspaces.patterns, vec!["packages/**/*"]);
        assert_eq!(resolved.workspaces.protocols, vec!["workspace:"]);
        assert_eq!(
            resolved.workspaces.ignore,
            vec!["**/node_modules/**", "**/lib/**", "**/dist/**"]
        );
        assert_eq!(resolved.layers.len(), 1);
    }

    #[test]
    fn test_provided_mode_kept() {
        let mut config = single_layer_config();
        config.enforcement = Some(PartialEnforcementConfig {
            mode: Some(EnforcementMode::Error),
        });
        let resolved = apply_defaults(config);
        assert_eq!(resolved.enforcement.mode, EnforcementMode::Error);
    }

    #[test]
    fn test_partial_workspaces_merge_field_level() {
        let mut config = single_layer_config();
        config.workspaces = Some(PartialWorkspaceConfig {
            patterns: Some(vec!["apps/*".to_string()]),
            protocols: None,
            ignore: None,
        });
        let resolved = apply_defaults(config);
        assert_eq!(resolved.workspaces.patterns, vec!["apps/*"]);
        // Unprovided fields still take their defaults.
        assert_eq!(resolved.workspaces.protocols, vec!["workspace:"]);
        assert_eq!(
            resolved.workspaces.ignore,
            vec!["**/node_modules/**", "**/lib/**", "**/dist/**"]
        );
    }

    #[test]
    fn test_layers_pass_through_unchanged() {
        let config = single_layer_config();
        let resolved = apply_defaults(config);
        assert!(resolved.layers.contains_key("core"));
        assert!(resolved.layers["core"].allowed_dependencies.is_empty());
    }
}
