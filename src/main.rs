// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Luotain - Website Technical Risk Diagnosis
 * Standalone CLI: renders each target in a real browser and reports
 * detected stack, vulnerable library versions, console errors and paint
 * latency as JSON
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use validator::Validate;

use luotain::config::DiagnosisConfig;
use luotain::engine::DiagnosisEngine;
use luotain::types::DiagnosisResult;

/// Luotain - Website Technical Risk Diagnosis
#[derive(Parser)]
#[command(name = "luotain")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.0.0")]
#[command(about = "Website technical-risk diagnosis. Real browser, real signals.", long_about = None)]
struct Cli {
    /// Target URL(s) to diagnose
    #[arg(required = true)]
    targets: Vec<String>,

    /// Write the JSON results to this file as well as stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Navigation timeout per wait tier, in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Show the browser window instead of running headless
    #[arg(long)]
    show_browser: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        Level::TRACE
    } else if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = DiagnosisConfig {
        headless: !cli.show_browser,
        navigation_timeout_secs: cli.timeout,
        dom_ready_timeout_secs: cli.timeout,
        ..Default::default()
    };
    config.validate().context("Invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: DiagnosisConfig) -> Result<()> {
    info!("Luotain v1.0.0 - Checking {} domain(s)", cli.targets.len());

    let engine = DiagnosisEngine::new(config);
    let mut results: Vec<DiagnosisResult> = Vec::new();

    for target in &cli.targets {
        let url = normalize_url(target);
        results.push(engine.diagnose(&url).await);
    }

    // A single target prints as one object, several as an array
    let rendered = if results.len() == 1 {
        serde_json::to_string_pretty(&results[0])?
    } else {
        serde_json::to_string_pretty(&results)?
    };

    println!("{rendered}");

    if let Some(path) = &cli.output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        info!("Results also saved to {}", path.display());
    }

    Ok(())
}

/// Callers must hand the engine an absolute URL; default to https for
/// scheme-less input.
fn normalize_url(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_url_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }
}
