//! End-to-end tests for the enforcement pipeline: config file on disk,
//! a packages tree, allowlist files, and the full validate_layers run.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use stratify::api::{validate_layers, ValidateLayersOptions};
use stratify::config::EnforcementMode;
use stratify::formatters::format_json;
use stratify::report::{build_report, ReportMetadata};
use stratify::validation::ViolationType;

fn write_config(root: &Path, content: &str) {
    fs::write(root.join("stratify.config.json"), content).unwrap();
}

fn write_package(root: &Path, dir: &str, content: &str) {
    let pkg_dir = root.join(dir);
    fs::create_dir_all(&pkg_dir).unwrap();
    fs::write(pkg_dir.join("package.json"), content).unwrap();
}

fn options_for(root: &Path) -> ValidateLayersOptions {
    ValidateLayersOptions {
        workspace_root: Some(root.to_path_buf()),
        ..Default::default()
    }
}

const THREE_LAYER_CONFIG: &str = r#"{
    "layers": {
        "ui": { "allowedDependencies": ["core"] },
        "core": { "allowedDependencies": ["infra"] },
        "infra": { "allowedDependencies": [] }
    }
}"#;

#[test]
fn compliant_workspace_reports_no_violations() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/ui",
        r#"{ "name": "@app/ui", "layer": "ui",
             "dependencies": { "@app/core": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/core",
        r#"{ "name": "@app/core", "layer": "core",
             "dependencies": { "@app/infra": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.total_packages, 3);
    assert!(outcome.violations.is_empty());
    assert!(outcome.warnings.is_empty());
    assert!(outcome.duration >= 0.0);
}

#[test]
fn cross_layer_dependency_is_reported_with_details() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/ui",
        r#"{ "name": "@app/ui", "layer": "ui",
             "dependencies": { "@app/infra": "workspace:*", "react": "^18.0.0" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.violations.len(), 1);

    let v = &outcome.violations[0];
    assert_eq!(v.kind, ViolationType::InvalidDependency);
    assert_eq!(v.package, "@app/ui");
    let details = v.details.as_ref().unwrap();
    assert_eq!(details.from_layer.as_deref(), Some("ui"));
    assert_eq!(details.to_layer.as_deref(), Some("infra"));
    assert_eq!(details.allowed_layers, Some(vec!["core".to_string()]));
    assert!(v.detailed_message.contains("packages/ui/package.json"));
}

#[test]
fn missing_layer_is_the_only_violation_for_a_package() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/anon",
        r#"{ "name": "@app/anon",
             "dependencies": { "@app/infra": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.violations.len(), 1);
    let v = &outcome.violations[0];
    assert_eq!(v.kind, ViolationType::MissingLayer);
    assert!(v.detailed_message.len() > v.message.len());
}

#[test]
fn unknown_layer_message_lists_all_valid_layers() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/reports",
        r#"{ "name": "@app/reports", "layer": "data" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.violations.len(), 1);
    let v = &outcome.violations[0];
    assert_eq!(v.kind, ViolationType::UnknownLayer);
    assert!(v.message.contains("ui"));
    assert!(v.message.contains("core"));
    assert!(v.message.contains("infra"));
}

#[test]
fn membership_violation_from_allowlist_file_skips_dependency_checks() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": {
                "legacy": {
                    "allowedDependencies": [],
                    "allowedPackagesFile": "allowed-legacy.json"
                },
                "infra": { "allowedDependencies": [] }
            }
        }"#,
    );
    fs::write(
        tmp.path().join("allowed-legacy.json"),
        r#"["@app/old"]"#,
    )
    .unwrap();
    // Disallowed member with a dependency that would also violate the
    // layer rules; only the membership violation may surface.
    write_package(
        tmp.path(),
        "packages/new",
        r#"{ "name": "@app/new", "layer": "legacy",
             "dependencies": { "@app/infra": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.violations.len(), 1);
    let v = &outcome.violations[0];
    assert_eq!(v.kind, ViolationType::UnauthorizedLayerMember);
    assert_eq!(
        v.details
            .as_ref()
            .unwrap()
            .allowed_packages_source
            .as_deref(),
        Some("allowed-legacy.json")
    );
}

#[test]
fn inline_allowed_packages_admit_listed_members() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": {
                "legacy": {
                    "allowedDependencies": [],
                    "allowedPackages": ["@app/old"]
                }
            }
        }"#,
    );
    write_package(
        tmp.path(),
        "packages/old",
        r#"{ "name": "@app/old", "layer": "legacy" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert!(outcome.violations.is_empty());
}

#[test]
fn empty_allowlist_file_fails_with_clear_message() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": {
                "legacy": {
                    "allowedDependencies": [],
                    "allowedPackagesFile": "allowed.json"
                }
            }
        }"#,
    );
    fs::write(tmp.path().join("allowed.json"), "[]").unwrap();
    fs::create_dir_all(tmp.path().join("packages")).unwrap();

    let err = validate_layers(&options_for(tmp.path())).unwrap_err();
    assert_eq!(err.kind(), "config-validation-error");
    assert!(err.to_string().contains("at least one package name"));
}

#[test]
fn off_mode_skips_discovery_entirely() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": { "ui": { "allowedDependencies": [] } },
            "enforcement": { "mode": "off" }
        }"#,
    );
    // A package that would violate the rules if discovery ran.
    write_package(
        tmp.path(),
        "packages/anon",
        r#"{ "name": "@app/anon" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.total_packages, 0);
    assert!(outcome.violations.is_empty());
    assert!(outcome.packages.is_empty());
}

#[test]
fn mode_override_reenables_validation() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": { "ui": { "allowedDependencies": [] } },
            "enforcement": { "mode": "off" }
        }"#,
    );
    write_package(
        tmp.path(),
        "packages/anon",
        r#"{ "name": "@app/anon" }"#,
    );

    let outcome = validate_layers(&ValidateLayersOptions {
        workspace_root: Some(tmp.path().to_path_buf()),
        mode: Some(EnforcementMode::Error),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(outcome.total_packages, 1);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.config.enforcement.mode, EnforcementMode::Error);
}

#[test]
fn invalid_config_reports_every_broken_layer() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": {
                "ui": "broken",
                "core": { "allowedDependencies": [1] },
                "infra": { "allowedDependencies": [] }
            }
        }"#,
    );

    let err = validate_layers(&options_for(tmp.path())).unwrap_err();
    assert_eq!(err.kind(), "config-validation-error");
    let rendered = err.to_string();
    assert!(rendered.contains("\"ui\""));
    assert!(rendered.contains("\"core\""));
}

#[test]
fn custom_workspace_patterns_and_protocols_are_honored() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"{
            "layers": {
                "ui": { "allowedDependencies": [] },
                "core": { "allowedDependencies": [] }
            },
            "workspaces": {
                "patterns": ["apps/*"],
                "protocols": ["link:"]
            }
        }"#,
    );
    // Outside the configured pattern; must not be discovered.
    write_package(
        tmp.path(),
        "packages/ignored",
        r#"{ "name": "@app/ignored" }"#,
    );
    write_package(
        tmp.path(),
        "apps/web",
        r#"{ "name": "@app/web", "layer": "ui",
             "dependencies": { "@app/core": "link:../core", "@app/infra": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "apps/core",
        r#"{ "name": "@app/core", "layer": "core" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.total_packages, 2);
    // Only the link: dependency is internal; ui allows nothing, so the
    // edge to @app/core is the single violation.
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(
        outcome.violations[0]
            .details
            .as_ref()
            .unwrap()
            .to_package
            .as_deref(),
        Some("@app/core")
    );
}

#[test]
fn unparseable_package_json_is_a_warning_not_an_error() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(tmp.path(), "packages/broken", "{ nope");
    write_package(
        tmp.path(),
        "packages/ui",
        r#"{ "name": "@app/ui", "layer": "ui" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(outcome.total_packages, 1);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].path.contains("broken"));
}

#[test]
fn json_report_serializes_the_full_outcome() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/ui",
        r#"{ "name": "@app/ui", "layer": "ui",
             "dependencies": { "@app/infra": "workspace:*" } }"#,
    );
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let outcome = validate_layers(&options_for(tmp.path())).unwrap();
    let report = build_report(
        outcome.violations,
        ReportMetadata {
            total_packages: outcome.total_packages,
            duration: outcome.duration,
        },
    );
    let parsed: serde_json::Value = serde_json::from_str(&format_json(&report)).unwrap();
    assert_eq!(parsed["totalPackages"], 2);
    assert_eq!(parsed["violationCount"], 1);
    assert_eq!(parsed["violations"][0]["type"], "invalid-dependency");
    assert!(parsed["duration"].as_f64().unwrap() >= 0.0);
}

#[test]
fn repeated_runs_are_identical() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), THREE_LAYER_CONFIG);
    write_package(
        tmp.path(),
        "packages/ui",
        r#"{ "name": "@app/ui", "layer": "ui",
             "dependencies": { "@app/infra": "workspace:*" } }"#,
    );
    write_package(tmp.path(), "packages/anon", r#"{ "name": "@app/anon" }"#);
    write_package(
        tmp.path(),
        "packages/infra",
        r#"{ "name": "@app/infra", "layer": "infra" }"#,
    );

    let first = validate_layers(&options_for(tmp.path())).unwrap();
    let second = validate_layers(&options_for(tmp.path())).unwrap();
    assert_eq!(first.violations, second.violations);
}
