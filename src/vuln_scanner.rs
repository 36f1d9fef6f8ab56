// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Vulnerable Library Scanner
 * Version-bounded signature scan of rendered markup
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::markup::{truncate_chars, window};
use crate::patterns::{BARE_VERSION, VULNERABLE_PATTERNS};
use crate::types::VulnerabilityFinding;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::warn;

/// Chars kept on each side of a hit when extracting a version number.
const VERSION_CONTEXT_RADIUS: usize = 50;

/// Chars of raw source kept as evidence per finding.
const EXCERPT_CHARS: usize = 100;

/// Chars following a jQuery hit inspected by the body-context guard.
const JQUERY_GUARD_WINDOW: usize = 100;

/// Core jQuery library filename at the match site: "jquery" + separator +
/// dotted version + optional ".min" + ".js" (e.g. "jquery-1.8.3.min.js").
static JQUERY_CORE_FILE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^jquery[.-]\d+(?:\.\d+)*(?:\.min)?\.js")
        .case_insensitive(true)
        .build()
        .expect("jquery core file pattern must compile")
});

/// Scan rendered markup against the vulnerability-signature catalog.
///
/// Signatures run in catalog scan order (specific before broad, see
/// `patterns`), one finding at most per signature, one finding at most per
/// dedup key. A second instance of the same signature on the page - even a
/// differently-versioned one - is not reported; the scan stops at the first
/// qualifying match per pattern.
pub fn scan_vulnerabilities(markup: &str) -> Vec<VulnerabilityFinding> {
    let mut found_keys: HashSet<String> = HashSet::new();
    let mut findings = Vec::new();

    for signature in VULNERABLE_PATTERNS.iter() {
        for hit in signature.regex.find_iter(markup) {
            let context = window(
                markup,
                hit.start().saturating_sub(VERSION_CONTEXT_RADIUS),
                hit.end() + VERSION_CONTEXT_RADIUS,
            );
            let version = BARE_VERSION
                .captures(context)
                .map(|caps| caps[1].to_string())
                .unwrap_or_else(|| "unknown".to_string());

            let key = match dedup_key(signature.key, &version, markup, hit.start()) {
                Some(key) => key,
                // Guard rejected the match site (jQuery plugin file)
                None => continue,
            };

            if found_keys.contains(&key) {
                continue;
            }
            found_keys.insert(key);

            let matched_text = truncate_chars(&markup[hit.start()..hit.end()], EXCERPT_CHARS);
            warn!(
                "[VulnScan] Found vulnerability: {} (version: {})",
                signature.key, version
            );
            findings.push(VulnerabilityFinding {
                vuln_type: signature.key.to_string(),
                version,
                matched_text,
            });

            // Only the first qualifying match per signature is kept
            break;
        }
    }

    findings
}

/// Dedup key derived from the finding semantics rather than the raw
/// signature id. Returns `None` when the jQuery body-context guard rejects
/// the match site.
fn dedup_key(signature_key: &str, version: &str, markup: &str, hit_start: usize) -> Option<String> {
    if signature_key.contains("angularjs") {
        return Some(format!("angularjs_{version}"));
    }

    if signature_key.contains("jquery") && !signature_key.contains("ui") {
        let guard = window(markup, hit_start, hit_start + JQUERY_GUARD_WINDOW).to_lowercase();
        let is_core_library = guard.contains("jquery.js")
            || guard.contains("jquery.min.js")
            || guard.contains("jquery/")
            || guard.contains("/jquery")
            || JQUERY_CORE_FILE.is_match(&guard);
        if !is_core_library {
            // Plugin file that merely mentions jquery in its own name
            return None;
        }
        return Some(format!("jquery_{version}"));
    }

    if signature_key.contains("wordpress")
        || signature_key.contains("drupal")
        || signature_key.contains("joomla")
    {
        // CMS signatures collapse to the technology itself, version ignored
        return Some(signature_key.to_string());
    }

    if version == "unknown" {
        Some(signature_key.to_string())
    } else {
        Some(format!("{signature_key}_{version}"))
    }
}
