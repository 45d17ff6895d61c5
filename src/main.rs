//! CLI entry point for stratify.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use stratify::api::{validate_layers, ValidateLayersOptions};
use stratify::config::EnforcementMode;
use stratify::formatters::{format_console, format_json};
use stratify::report::{build_report, ReportMetadata};

#[derive(Parser)]
#[command(name = "stratify")]
#[command(version)]
#[command(about = "Enforce architectural layer rules across monorepo packages", long_about = None)]
struct Cli {
    /// Path to the config file, relative to the workspace root
    #[arg(long, default_value = "stratify.config.json")]
    config: PathBuf,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Override the enforcement mode from the config
    #[arg(long, value_enum)]
    mode: Option<EnforcementMode>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Console,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let workspace_root = cli
        .root
        .canonicalize()
        .with_context(|| format!("Failed to resolve workspace root {}", cli.root.display()))?;

    if cli.format == OutputFormat::Console {
        println!("{}", "Enforce Layers".bold());
        println!("{}", format!("Root: {}", workspace_root.display()).dimmed());
        println!(
            "{}",
            format!("Config: {}", workspace_root.join(&cli.config).display()).dimmed()
        );
        println!();
    }

    let options = ValidateLayersOptions {
        workspace_root: Some(workspace_root),
        config_path: Some(cli.config.clone()),
        config: None,
        mode: cli.mode,
    };

    let outcome = match validate_layers(&options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let effective_mode = outcome.config.enforcement.mode;
    if cli.format == OutputFormat::Console {
        println!(
            "{}",
            format!(
                "Loaded config with {} layers (mode: {})",
                outcome.config.layers.len(),
                effective_mode
            )
            .green()
        );
        println!(
            "{}",
            format!("Discovered {} packages", outcome.total_packages).green()
        );
        if !outcome.warnings.is_empty() {
            println!(
                "{}",
                format!("{} warnings", outcome.warnings.len()).yellow()
            );
            for warning in &outcome.warnings {
                println!(
                    "{}",
                    format!("  - {}: {}", warning.path, warning.message).yellow()
                );
            }
        }
        println!();
    }

    let has_violations = !outcome.violations.is_empty();
    let report = build_report(
        outcome.violations,
        ReportMetadata {
            total_packages: outcome.total_packages,
            duration: outcome.duration,
        },
    );

    match cli.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Console => {
            let rendered = format_console(&report, effective_mode);
            if has_violations {
                println!("{}", rendered.red());
            } else {
                println!("{}", rendered.green());
            }
        }
    }

    if effective_mode == EnforcementMode::Error && has_violations {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
