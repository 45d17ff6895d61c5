//! Package discovery: globbing for package.json files under the
//! workspace root.
//!
//! A failed glob pattern is fatal; an individual package.json that
//! fails to read or parse only produces a warning so one broken file
//! cannot hide the rest of the workspace.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::config::WorkspaceConfig;
use crate::errors::DiscoveryError;
use crate::package::{parse_package_json, Package};

/// Non-fatal problem encountered while reading one package.json.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryWarning {
    pub path: String,
    pub message: String,
}

/// Outcome of a discovery run: the packages that parsed plus warnings
/// for the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    pub packages: Vec<Package>,
    pub warnings: Vec<DiscoveryWarning>,
}

/// Discover all workspace packages by globbing `<pattern>/package.json`
/// for every configured pattern, skipping paths matched by any ignore
/// pattern.
pub fn discover_packages(
    root: &Path,
    workspaces: &WorkspaceConfig,
) -> Result<DiscoveryResult, DiscoveryError> {
    let ignore = compile_ignore_patterns(&workspaces.ignore);
    let mut relative_paths: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in &workspaces.patterns {
        let full_pattern = root.join(pattern).join("package.json");
        let full_pattern = full_pattern.to_string_lossy().into_owned();

        let entries = glob::glob(&full_pattern).map_err(|e| DiscoveryError::GlobFailed {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                // Unreadable directory during traversal, not a bad pattern.
                Err(_) => continue,
            };
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            if is_ignored(&relative, &ignore) {
                continue;
            }
            if seen.insert(relative.clone()) {
                relative_paths.push(relative);
            }
        }
    }

    let mut result = DiscoveryResult::default();

    for relative in relative_paths {
        let full_path = root.join(&relative);
        let display = relative.to_string_lossy().into_owned();

        let content = match fs::read_to_string(&full_path) {
            Ok(content) => content,
            Err(e) => {
                result.warnings.push(DiscoveryWarning {
                    path: display,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let parsed: serde_json::Value = match serde_json::from_str(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                result.warnings.push(DiscoveryWarning {
                    path: display,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match parse_package_json(&parsed, &display, &workspaces.protocols) {
            Ok(package) => result.packages.push(package),
            Err(e) => result.warnings.push(DiscoveryWarning {
                path: display,
                message: e.to_string(),
            }),
        }
    }

    Ok(result)
}

fn compile_ignore_patterns(ignore: &[String]) -> Vec<Pattern> {
    // Invalid ignore patterns are dropped rather than failing the run;
    // they can only ever widen the result set.
    ignore
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
}

fn is_ignored(relative: &Path, ignore: &[Pattern]) -> bool {
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::default()
    };
    ignore
        .iter()
        .any(|pattern| pattern.matches_path_with(relative, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspaces(patterns: &[&str], ignore: &[&str]) -> WorkspaceConfig {
        WorkspaceConfig {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            protocols: vec!["workspace:".to_string()],
            ignore: ignore.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn write_package(root: &Path, dir: &str, content: &str) {
        let pkg_dir = root.join(dir);
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(pkg_dir.join("package.json"), content).unwrap();
    }

    #[test]
    fn test_discovers_packages_under_patterns() {
        let tmp = TempDir::new().unwrap();
        write_package(
            tmp.path(),
            "packages/ui",
            r#"{ "name": "@app/ui", "layer": "ui" }"#,
        );
        write_package(
            tmp.path(),
            "packages/core",
            r#"{ "name": "@app/core", "layer": "core" }"#,
        );

        let result = discover_packages(tmp.path(), &workspaces(&["packages/*"], &[])).unwrap();
        assert_eq!(result.packages.len(), 2);
        assert!(result.warnings.is_empty());

        let mut names: Vec<&str> =
            result.packages.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["@app/core", "@app/ui"]);
    }

    #[test]
    fn test_ignore_patterns_exclude_paths() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "packages/ui", r#"{ "name": "@app/ui" }"#);
        write_package(
            tmp.path(),
            "packages/ui/node_modules/dep",
            r#"{ "name": "dep" }"#,
        );

        let result = discover_packages(
            tmp.path(),
            &workspaces(&["packages/**"], &["**/node_modules/**"]),
        )
        .unwrap();
        let names: Vec<&str> = result.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["@app/ui"]);
    }

    #[test]
    fn test_broken_package_json_becomes_warning() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "packages/ui", r#"{ "name": "@app/ui" }"#);
        write_package(tmp.path(), "packages/broken", "{ not json");
        write_package(tmp.path(), "packages/anon", r#"{ "layer": "ui" }"#);

        let result = discover_packages(tmp.path(), &workspaces(&["packages/*"], &[])).unwrap();
        assert_eq!(result.packages.len(), 1);
        assert_eq!(result.packages[0].name, "@app/ui");
        assert_eq!(result.warnings.len(), 2);
        for warning in &result.warnings {
            assert!(warning.path.contains("package.json"));
        }
    }

    #[test]
    fn test_overlapping_patterns_deduplicate() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "packages/ui", r#"{ "name": "@app/ui" }"#);

        let result =
            discover_packages(tmp.path(), &workspaces(&["packages/*", "packages/ui"], &[]))
                .unwrap();
        assert_eq!(result.packages.len(), 1);
    }

    #[test]
    fn test_invalid_glob_pattern_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = discover_packages(tmp.path(), &workspaces(&["packages/[**"], &[]))
            .unwrap_err();
        match err {
            DiscoveryError::GlobFailed { pattern, .. } => {
                assert_eq!(pattern, "packages/[**");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_workspace() {
        let tmp = TempDir::new().unwrap();
        let result = discover_packages(tmp.path(), &workspaces(&["packages/*"], &[])).unwrap();
        assert!(result.packages.is_empty());
        assert!(result.warnings.is_empty());
    }
}
