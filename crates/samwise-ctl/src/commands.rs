//! Command implementations for samwise-ctl.
//!
//! Handles:
//! - check: Load and validate an ecosystem file, exit non-zero on error
//! - show: Validate, register, and print the declarations with next triggers

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use samwise_loader::{load, JobRegistry};

/// Initialize logging. RUST_LOG overrides the CLI flag, which overrides
/// the "info" default, matching the daemon convention.
pub fn init_logging(log_level: Option<&str>) -> Result<()> {
    let default_level = log_level.unwrap_or("info");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Validate an ecosystem file.
///
/// Prints one line per declaration and a summary. Any invalid declaration
/// makes the whole load fail, so the operator corrects the file before
/// the scheduler ever sees it.
pub fn check(file: &Path) -> Result<()> {
    let decls = load(file).with_context(|| format!("{} failed validation", file.display()))?;

    for decl in &decls {
        info!(job = %decl.name, cron = %decl.cron, instances = decl.instances, "OK");
    }
    println!(
        "{}: {} declaration(s) valid",
        file.display(),
        decls.len()
    );
    Ok(())
}

/// List the declarations in a file, registered, with next trigger times.
pub fn show(file: &Path, json: bool) -> Result<()> {
    let decls = load(file).with_context(|| format!("{} failed validation", file.display()))?;

    let registry = JobRegistry::new();
    registry.register_all(decls);

    let now = Utc::now();
    if json {
        let snapshot = registry.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for decl in registry.snapshot() {
        let next = decl
            .cron
            .next_after(now)
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<24} {:<16} instances={} autorestart={} watch={} next={}",
            decl.name,
            decl.cron.to_string(),
            decl.instances,
            decl.autorestart,
            decl.watch,
            next
        );
    }
    Ok(())
}
