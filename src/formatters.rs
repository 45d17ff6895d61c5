//! Output formatters for validation reports.
//!
//! Both formatters return plain strings; coloring is a CLI concern and
//! happens in the binary.

use serde_json::json;

use crate::config::EnforcementMode;
use crate::report::ValidationReport;

/// Format a report as human-readable console text: grouped violations
/// with per-kind labels, or a success line, plus a duration footer.
pub fn format_console(report: &ValidationReport, mode: EnforcementMode) -> String {
    let mut lines: Vec<String> = Vec::new();
    let duration = format_duration(report.duration);

    if report.violations.is_empty() {
        lines.push("All packages comply with layer rules!".to_string());
        lines.push(String::new());
        lines.push(format!("Completed in {}", duration));
        return lines.join("\n");
    }

    lines.push(format!(
        "Found {} layer violation{}:",
        report.violation_count,
        if report.violation_count == 1 { "" } else { "s" }
    ));
    lines.push(String::new());

    for (kind, violations) in &report.violations_by_type {
        lines.push(format!("  {} ({}):", kind.label(), violations.len()));
        for violation in violations {
            lines.push(format!("    - {}", violation.message));
        }
        lines.push(String::new());
    }

    lines.push(format!("Completed in {}", duration));

    if mode == EnforcementMode::Warn {
        lines.push(String::new());
        lines.push("Enforcement mode: warn - not failing build".to_string());
    }

    lines.join("\n")
}

/// Format a report as pretty-printed JSON. A direct structural
/// serialization of the report fields; nothing is transformed or
/// dropped.
pub fn format_json(report: &ValidationReport) -> String {
    let value = json!({
        "violations": &report.violations,
        "totalPackages": report.total_packages,
        "violationCount": report.violation_count,
        "duration": report.duration,
    });
    // json! cannot produce invalid JSON from serializable inputs.
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}
