// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Report Assembler
 * Final derivation of the diagnosis record; pure, no I/O
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::fusion::primary_label;
use crate::types::{DiagnosisResult, MergedTechnology};
use url::Url;

/// Host portion of the URL with any "www." prefix stripped. Falls back to
/// the first path segment for scheme-less or host-less inputs, and to the
/// input itself when nothing parses.
pub fn extract_domain(url: &str) -> String {
    let host = match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => parsed
                .path()
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        },
        Err(_) => url.to_string(),
    };

    let domain = if host.is_empty() { url.to_string() } else { host };
    domain
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or(domain)
}

/// "1234" ms -> "1.2s"; unknown -> "N/A".
pub fn format_load_time(fcp_ms: Option<u64>) -> String {
    match fcp_ms {
        Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
        None => "N/A".to_string(),
    }
}

/// Fold the derived fields into the result record. Everything else on the
/// record was filled by the run itself.
pub fn assemble(result: &mut DiagnosisResult, merged: &[MergedTechnology]) {
    result.domain = extract_domain(&result.url);
    result.tech = primary_label(merged, &result.vulnerabilities);
    result.console_error_count = result.console_errors.len();
    result.load_time = format_load_time(result.first_contentful_paint_ms);
    result.vulnerability_detected = !result.vulnerabilities.is_empty();
}
