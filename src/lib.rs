//! # Stratify - Architectural Layer Enforcement
//!
//! Stratify enforces architectural "layer" rules across packages in a
//! monorepo. Each package declares a layer in its package.json; the
//! stratify config defines which layers may depend on which other
//! layers and, optionally, which packages may belong to a layer. The
//! tool discovers packages, extracts their internal dependency edges,
//! and reports violations.
//!
//! ## Core Concepts
//!
//! - **Layers**: named architectural tiers (e.g. ui, core, infra) with
//!   per-layer `allowedDependencies` rules
//! - **Violations**: classified findings (missing-layer, unknown-layer,
//!   unauthorized-layer-member, invalid-dependency) with short and
//!   detailed messages
//! - **Enforcement modes**: `error` fails the run, `warn` reports
//!   without failing, `off` skips validation entirely
//!
//! ## Modules
//!
//! - [`config`] - configuration types, schema validation, defaults
//! - [`rules`] - the pure rule predicates
//! - [`validation`] - the validation engine
//! - [`report`] - violation grouping and run metadata
//! - [`discovery`] - package.json discovery over glob patterns
//! - [`api`] - the end-to-end enforcement pipeline
//!
//! ## Example
//!
//! ```no_run
//! use stratify::api::{validate_layers, ValidateLayersOptions};
//!
//! let outcome = validate_layers(&ValidateLayersOptions::default())
//!     .expect("enforcement run failed");
//! for violation in &outcome.violations {
//!     eprintln!("{}", violation.detailed_message);
//! }
//! ```

pub mod allowlist;
pub mod api;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod formatters;
pub mod messages;
pub mod package;
pub mod report;
pub mod rules;
pub mod validation;
