//! Report building: grouping violations and attaching run metadata.

use indexmap::IndexMap;
use serde::Serialize;

use crate::validation::{Violation, ViolationType};

/// Structured report produced after validation, consumed by the
/// console and JSON formatters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// All violations in encounter order.
    pub violations: Vec<Violation>,
    pub total_packages: usize,
    /// Violations grouped by type. Types with no violations are absent
    /// rather than present as empty groups; key order is first
    /// encounter order.
    pub violations_by_type: IndexMap<ViolationType, Vec<Violation>>,
    pub violation_count: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration: f64,
}

/// Run metadata attached to a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportMetadata {
    pub total_packages: usize,
    pub duration: f64,
}

/// Build a structured report from violations and run metadata. Pure
/// and total: a stable partition of the input, nothing dropped.
pub fn build_report(violations: Vec<Violation>, metadata: ReportMetadata) -> ValidationReport {
    let mut violations_by_type: IndexMap<ViolationType, Vec<Violation>> = IndexMap::new();

    for violation in &violations {
        violations_by_type
            .entry(violation.kind)
            .or_default()
            .push(violation.clone());
    }

    ValidationReport {
        violation_count: violations.len(),
        violations,
        total_packages: metadata.total_packages,
        violations_by_type,
        duration: metadata.duration,
    }
}
