// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Static Technology Matcher
 * Regex scan of rendered markup against the technology catalog
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::markup::window;
use crate::patterns::TECH_DETECTION_PATTERNS;
use crate::types::{Confidence, TechnologyFinding};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Chars scanned past a pattern hit when looking for a version number.
const VERSION_WINDOW: usize = 30;

/// Version preceded by a delimiter ("v1.2", " 1.2.3", "/1.2", "-1.2").
static CONTEXT_VERSION: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"[v\s/-](\d+\.\d+(?:\.\d+)?)")
        .case_insensitive(true)
        .build()
        .expect("context version pattern must compile")
});

/// Scan the full rendered markup against the technology catalog.
///
/// Every finding carries `Confidence::Low`; runtime introspection outranks
/// anything found here. For each technology, scanning stops at the first
/// match that yields a version; unversioned matches keep scanning (and keep
/// appending - fusion deduplicates by name). A second, differently-versioned
/// instance of an already-versioned technology on the same page is not
/// reported.
pub fn detect_technologies_static(markup: &str) -> Vec<TechnologyFinding> {
    let mut detected = Vec::new();

    for (name, regex) in TECH_DETECTION_PATTERNS.iter() {
        for hit in regex.find_iter(markup) {
            let context = window(markup, hit.end(), hit.end() + VERSION_WINDOW);
            let version = CONTEXT_VERSION
                .captures(context)
                .map(|caps| caps[1].to_string());

            let versioned = version.is_some();
            detected.push(TechnologyFinding::new(*name, version, Confidence::Low));

            if versioned {
                // First versioned instance is good enough for this technology
                break;
            }
        }
    }

    if !detected.is_empty() {
        debug!(
            "[Static] {} catalog hits across markup ({} bytes)",
            detected.len(),
            markup.len()
        );
    }

    detected
}
