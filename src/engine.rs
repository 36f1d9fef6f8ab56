// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Diagnosis Engine
 * One-run orchestration: render, introspect, match, scan, sample, classify
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::classify::classify;
use crate::config::DiagnosisConfig;
use crate::errors::DiagnosisError;
use crate::fusion::merge_detected_techs;
use crate::introspect::detect_technologies_via_browser;
use crate::observation::{attach_observation, ObservationGenerator};
use crate::performance::measure_first_contentful_paint;
use crate::render::{NavigationOutcome, RenderDriver};
use crate::report::assemble;
use crate::static_matcher::detect_technologies_static;
use crate::types::{DiagnosisResult, DiagnosisStatus, MergedTechnology};
use crate::vuln_scanner::scan_vulnerabilities;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Wait before sampling paint timing so late entries can land.
const PERFORMANCE_SETTLE: Duration = Duration::from_secs(1);

/// Runs diagnoses. Stateless across runs: every call owns its own browser
/// session, so concurrent calls never share in-memory state. Admission
/// control, if any, belongs to the caller.
pub struct DiagnosisEngine {
    config: DiagnosisConfig,
    observation_generator: Option<Arc<dyn ObservationGenerator>>,
}

impl DiagnosisEngine {
    pub fn new(config: DiagnosisConfig) -> Self {
        Self {
            config,
            observation_generator: None,
        }
    }

    /// Attach the optional advisory-generation collaborator.
    pub fn with_observation_generator(mut self, generator: Arc<dyn ObservationGenerator>) -> Self {
        self.observation_generator = Some(generator);
        self
    }

    /// Diagnose one URL. Never fails: every fault mode degrades to a valid
    /// result record with a terminal status.
    ///
    /// The browser work is synchronous, so it runs on the blocking pool; a
    /// panic in there is caught at the join and reported as a runtime
    /// fault rather than propagated.
    pub async fn diagnose(&self, url: &str) -> DiagnosisResult {
        info!("Starting diagnosis for {}", url);

        let config = self.config.clone();
        let owned_url = url.to_string();
        let mut result = tokio::task::spawn_blocking(move || diagnose_sync(&owned_url, &config))
            .await
            .unwrap_or_else(|join_error| {
                let fault =
                    DiagnosisError::RuntimeFault(format!("Diagnosis task panicked: {join_error}"));
                error!("{}", fault);
                let mut result = DiagnosisResult::new(url);
                set_terminal(&mut result, DiagnosisStatus::Error, Some(fault.to_string()));
                assemble(&mut result, &[]);
                result
            });

        if result.vulnerability_detected {
            if let Some(generator) = &self.observation_generator {
                attach_observation(generator.as_ref(), &mut result).await;
            }
        }

        info!("Diagnosis finished for {}: {}", url, result.status);
        result
    }
}

/// One full diagnosis inside the browser session. The `RenderDriver` owns
/// the session and releases it when this function returns, on every path.
fn diagnose_sync(url: &str, config: &DiagnosisConfig) -> DiagnosisResult {
    let mut result = DiagnosisResult::new(url);

    let driver = match RenderDriver::launch(config) {
        Ok(driver) => driver,
        Err(e) => {
            let fault = DiagnosisError::Browser(e.to_string());
            error!("{}", fault);
            set_terminal(&mut result, DiagnosisStatus::Error, Some(fault.to_string()));
            assemble(&mut result, &[]);
            return result;
        }
    };

    if driver.navigate(url, config) == NavigationOutcome::TimedOut {
        let fault = DiagnosisError::NavigationTimeout {
            waited_secs: config.total_navigation_budget_secs(),
        };
        error!("{}", fault);

        // Vulnerability and paint sampling are skipped, but whatever markup
        // was fetched still feeds best-effort tech detection
        result.console_errors = driver.console_errors();
        let markup = driver.content_or_empty();
        let merged = merge_detected_techs(&[], &detect_technologies_static(&markup));
        log_detected(&merged);

        set_terminal(&mut result, DiagnosisStatus::Timeout, Some(fault.to_string()));
        assemble(&mut result, &merged);
        return result;
    }

    let merged = run_probes(&driver, config, &mut result);
    log_detected(&merged);

    let status = classify(
        &result.console_errors,
        &result.vulnerabilities,
        result.first_contentful_paint_ms,
    );
    set_terminal(&mut result, status, None);
    assemble(&mut result, &merged);

    if !result.console_errors.is_empty() {
        info!("Found {} console errors", result.console_errors.len());
    }
    if !result.vulnerabilities.is_empty() {
        info!("Found {} vulnerabilities", result.vulnerabilities.len());
    }

    result
}

/// The sequential probe pipeline against a navigated page. Every stage
/// degrades on its own; none of them can fail the run.
fn run_probes(
    driver: &RenderDriver,
    config: &DiagnosisConfig,
    result: &mut DiagnosisResult,
) -> Vec<MergedTechnology> {
    // 1. Runtime introspection against the live page (most accurate)
    let runtime_techs = detect_technologies_via_browser(driver.tab());

    // 2. Static catalog scan over the rendered markup (fallback signal)
    let markup = driver.content_or_empty();
    let static_techs = detect_technologies_static(&markup);
    let merged = merge_detected_techs(&runtime_techs, &static_techs);

    // 3. Vulnerability signatures over the same markup
    result.vulnerabilities = scan_vulnerabilities(&markup);

    // 4. Paint timing
    std::thread::sleep(PERFORMANCE_SETTLE);
    result.first_contentful_paint_ms =
        measure_first_contentful_paint(driver.tab(), config.fcp_wait_ms);

    // 5. Console errors captured since before navigation
    result.console_errors = driver.console_errors();

    merged
}

fn set_terminal(result: &mut DiagnosisResult, status: DiagnosisStatus, error: Option<String>) {
    debug_assert!(!result.status.is_terminal(), "status is assigned once");
    result.status = status;
    result.error = error;
}

fn log_detected(merged: &[MergedTechnology]) {
    if merged.is_empty() {
        return;
    }
    let summary: Vec<String> = merged
        .iter()
        .take(5)
        .map(|t| match &t.version {
            Some(version) => format!("{} {}", t.name, version),
            None => t.name.clone(),
        })
        .collect();
    info!("Detected technologies: {}", summary.join(", "));
}
