//! Error taxonomy for the stratify pipeline.
//!
//! Every error in the library is a plain data value returned through
//! `Result`; nothing here is ever panicked or thrown. The binary may wrap
//! these in `anyhow` for process-level context, the library never does.

use thiserror::Error;

/// Errors produced while loading and validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The config or allowlist file does not exist.
    #[error("Config file not found: {path}")]
    NotFound { path: String },

    /// The file exists but could not be read.
    #[error("Failed to read config file ({path}): {message}")]
    ReadError { path: String, message: String },

    /// The file content is not valid JSON.
    #[error("Invalid JSON in config file ({path}): {message}")]
    ParseError { path: String, message: String },

    /// The parsed JSON does not match the expected schema. `details`
    /// carries one entry per offending layer definition so a user sees
    /// every problem in a single pass.
    #[error("{}", format_validation(.message, .details))]
    Validation {
        message: String,
        details: Vec<String>,
    },
}

impl ConfigError {
    /// Shorthand for a validation error with no sub-errors.
    pub fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

fn format_validation(message: &str, details: &[String]) -> String {
    if details.is_empty() {
        format!("Config validation failed: {}", message)
    } else {
        let bullets: Vec<String> = details.iter().map(|d| format!("  - {}", d)).collect();
        format!("Config validation failed:\n{}", bullets.join("\n"))
    }
}

/// Errors produced during package discovery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    /// A workspace glob pattern could not be expanded.
    #[error("Glob pattern failed ({pattern}): {message}")]
    GlobFailed { pattern: String, message: String },

    /// A package.json file could not be parsed into a package.
    #[error("Failed to parse package at {path}: {message}")]
    PackageParseError { path: String, message: String },
}

/// Union of every error the pipeline can return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

impl LayerError {
    /// Stable machine-readable tag for each error variant, used by the
    /// JSON output and by tests. The match is exhaustive on purpose:
    /// adding a variant must not compile until it is tagged here.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerError::Config(ConfigError::NotFound { .. }) => "config-not-found",
            LayerError::Config(ConfigError::ReadError { .. }) => "config-read-error",
            LayerError::Config(ConfigError::ParseError { .. }) => "config-parse-error",
            LayerError::Config(ConfigError::Validation { .. }) => "config-validation-error",
            LayerError::Discovery(DiscoveryError::GlobFailed { .. }) => "glob-failed",
            LayerError::Discovery(DiscoveryError::PackageParseError { .. }) => {
                "package-parse-error"
            }
        }
    }
}
