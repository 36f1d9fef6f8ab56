// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Live Runtime Introspection
 * Technology detection against the rendered page context
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::DiagnosisError;
use crate::types::{Confidence, TechnologyFinding};
use anyhow::{Context, Result};
use headless_chrome::Tab;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// One independent detection strategy against the live page.
type Detector = fn(&Tab) -> Result<Vec<TechnologyFinding>>;

/// Fixed, ordered detector list. Every detector runs on every page; a
/// failing detector is logged and skipped without affecting its siblings.
const DETECTORS: &[(&str, Detector)] = &[
    ("jquery-global", detect_jquery_global),
    ("angularjs-global", detect_angularjs_global),
    ("react-markers", detect_react_markers),
    ("nextjs-globals", detect_nextjs_globals),
    ("nuxt-global", detect_nuxt_global),
    ("bootstrap-global", detect_bootstrap_global),
    ("underscore-lodash-global", detect_underscore_lodash),
    ("moment-global", detect_moment_global),
    ("socketio-global", detect_socketio_global),
    ("meta-generator", detect_meta_generator),
    ("script-src-versions", detect_script_src_versions),
];

/// Run every detector against the rendered page.
///
/// Output carries no duplicate `(name, version)` pairs and preserves
/// discovery order. Individual detector failures are isolated: logged as
/// faults, siblings unaffected.
pub fn detect_technologies_via_browser(tab: &Tab) -> Vec<TechnologyFinding> {
    let mut findings: Vec<TechnologyFinding> = Vec::new();
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();

    for &(name, detector) in DETECTORS {
        match detector(tab) {
            Ok(batch) => {
                for finding in batch {
                    let key = (finding.name.clone(), finding.version.clone());
                    if seen.insert(key) {
                        debug!(
                            "[Introspect] {} found {}{}",
                            name,
                            finding.name,
                            finding
                                .version
                                .as_deref()
                                .map(|v| format!(" {v}"))
                                .unwrap_or_default()
                        );
                        findings.push(finding);
                    }
                }
            }
            Err(e) => {
                let fault = DiagnosisError::DetectorFault {
                    detector: name,
                    reason: e.to_string(),
                };
                warn!("[Introspect] {}", fault);
            }
        }
    }

    findings
}

// ---------------------------------------------------------------------------
// Evaluation helpers
// ---------------------------------------------------------------------------

/// Evaluate an expression expected to yield a string or null/undefined.
fn eval_optional_string(tab: &Tab, expr: &str) -> Result<Option<String>> {
    let remote = tab.evaluate(expr, false)?;
    Ok(remote.value.and_then(|v| v.as_str().map(str::to_string)))
}

fn eval_bool(tab: &Tab, expr: &str) -> Result<bool> {
    let remote = tab.evaluate(expr, false)?;
    Ok(remote.value.and_then(|v| v.as_bool()).unwrap_or(false))
}

/// Evaluate an expression that returns a `JSON.stringify`'d payload.
fn eval_json<T: serde::de::DeserializeOwned>(tab: &Tab, expr: &str) -> Result<T> {
    let remote = tab.evaluate(expr, false)?;
    let value = remote.value.context("detector expression returned no value")?;
    let text = value.as_str().context("detector payload was not a string")?;
    serde_json::from_str(text).context("detector payload failed to parse")
}

fn single(name: &str, version: Option<String>, confidence: Confidence) -> Vec<TechnologyFinding> {
    vec![TechnologyFinding::new(name, version, confidence)]
}

// ---------------------------------------------------------------------------
// Runtime-object detectors
// ---------------------------------------------------------------------------

fn detect_jquery_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let version = eval_optional_string(
        tab,
        "window.jQuery && window.jQuery.fn && window.jQuery.fn.jquery || null",
    )?;
    Ok(version
        .map(|v| single("jquery", Some(v), Confidence::High))
        .unwrap_or_default())
}

fn detect_angularjs_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let version = eval_optional_string(
        tab,
        "window.angular && window.angular.version && window.angular.version.full || null",
    )?;
    Ok(version
        .map(|v| single("angularjs", Some(v), Confidence::High))
        .unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct RuntimeProbe {
    detected: bool,
    version: Option<String>,
}

/// React leaves no reliable global in production builds; look for Fiber and
/// container keys on the body, its children, and the usual mount ids, then
/// try the DevTools hook for an exact version.
fn detect_react_markers(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let probe: RuntimeProbe = eval_json(
        tab,
        r#"
        (() => {
            const isReactElement = (el) => {
                if (!el) return false;
                return Object.keys(el).some(key =>
                    key.startsWith('__reactFiber') ||
                    key.startsWith('__reactInternalInstance') ||
                    key.startsWith('__reactContainer') ||
                    key.startsWith('_reactRootContainer')
                );
            };

            let found = isReactElement(document.body);
            if (!found) {
                for (const child of document.body.children) {
                    if (isReactElement(child)) { found = true; break; }
                }
            }
            if (!found) {
                for (const id of ['root', 'app', '__next', 'main']) {
                    if (isReactElement(document.getElementById(id))) { found = true; break; }
                }
            }

            let version = null;
            const hook = window.__REACT_DEVTOOLS_GLOBAL_HOOK__;
            if (hook && hook.renderers) {
                try {
                    const renderers = hook.renderers;
                    if (renderers instanceof Map) {
                        for (const r of renderers.values()) {
                            if (r.version) { version = r.version; break; }
                        }
                    } else if (typeof renderers === 'object') {
                        for (const key in renderers) {
                            if (renderers[key] && renderers[key].version) {
                                version = renderers[key].version;
                                break;
                            }
                        }
                    }
                } catch (e) {}
            }

            if (version) return JSON.stringify({ detected: true, version: String(version) });
            if (found) return JSON.stringify({ detected: true, version: null });
            if (window.React && window.React.version) {
                return JSON.stringify({ detected: true, version: String(window.React.version) });
            }
            if (document.querySelector('[data-reactroot], [data-reactid]')) {
                return JSON.stringify({ detected: true, version: null });
            }
            if (window.__NEXT_DATA__ || window.next) {
                return JSON.stringify({ detected: true, version: null });
            }
            return JSON.stringify({ detected: false, version: null });
        })()
        "#,
    )?;

    Ok(if probe.detected {
        single("react", probe.version, Confidence::High)
    } else {
        Vec::new()
    })
}

fn detect_nextjs_globals(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let probe: RuntimeProbe = eval_json(
        tab,
        r#"
        (() => {
            if (window.__NEXT_DATA__) return JSON.stringify({ detected: true, version: null });
            if (window.next && window.next.version) {
                return JSON.stringify({ detected: true, version: String(window.next.version) });
            }
            return JSON.stringify({ detected: false, version: null });
        })()
        "#,
    )?;

    Ok(if probe.detected {
        single("nextjs", probe.version, Confidence::High)
    } else {
        Vec::new()
    })
}

fn detect_nuxt_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    Ok(if eval_bool(tab, "!!window.__NUXT__")? {
        single("nuxt", None, Confidence::High)
    } else {
        Vec::new()
    })
}

/// Medium confidence so frameworks keep winning the label when both are
/// present.
fn detect_bootstrap_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let version = eval_optional_string(
        tab,
        "window.bootstrap && window.bootstrap.Tooltip && window.bootstrap.Tooltip.VERSION || null",
    )?;
    Ok(version
        .map(|v| single("bootstrap", Some(v), Confidence::Medium))
        .unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct NamedProbe {
    name: String,
    version: Option<String>,
}

/// Underscore and Lodash share the `_` global; `templateSettings` tells
/// them apart.
fn detect_underscore_lodash(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let probe: Option<NamedProbe> = eval_json(
        tab,
        r#"
        (() => {
            if (window._ && window._.VERSION) {
                return JSON.stringify({
                    name: window._.templateSettings ? 'underscore' : 'lodash',
                    version: String(window._.VERSION)
                });
            }
            return JSON.stringify(null);
        })()
        "#,
    )?;

    Ok(probe
        .map(|p| single(&p.name, p.version, Confidence::Medium))
        .unwrap_or_default())
}

fn detect_moment_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let version =
        eval_optional_string(tab, "window.moment && window.moment.version || null")?;
    Ok(version
        .map(|v| single("moment", Some(v), Confidence::Medium))
        .unwrap_or_default())
}

fn detect_socketio_global(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let version = eval_optional_string(tab, "window.io && window.io.version || null")?;
    Ok(version
        .map(|v| single("socketio", Some(v), Confidence::Medium))
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Structural detectors
// ---------------------------------------------------------------------------

/// CMS ids recognized in generator meta tags.
const GENERATOR_CMS: &[&str] = &[
    "wordpress",
    "drupal",
    "joomla",
    "shopify",
    "magento",
    "wix",
    "squarespace",
];

/// "<name> <major>.<minor>[.<patch>]" inside a generator tag.
static GENERATOR_VERSIONS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    GENERATOR_CMS
        .iter()
        .map(|cms| {
            let regex = RegexBuilder::new(&format!(r"{cms}\s+(\d+\.\d+(?:\.\d+)?)"))
                .case_insensitive(true)
                .build()
                .expect("generator version pattern must compile");
            (*cms, regex)
        })
        .collect()
});

fn detect_meta_generator(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let contents: Vec<String> = eval_json(
        tab,
        r#"JSON.stringify(
            Array.from(document.querySelectorAll('meta[name="generator"]'))
                .map(meta => meta.content || '')
        )"#,
    )?;

    Ok(contents
        .iter()
        .flat_map(|content| parse_generator_content(content))
        .collect())
}

/// Parse one generator tag's content against the CMS table.
pub(crate) fn parse_generator_content(content: &str) -> Vec<TechnologyFinding> {
    let lower = content.to_lowercase();
    let mut findings = Vec::new();

    for (cms, version_regex) in GENERATOR_VERSIONS.iter() {
        if lower.contains(cms) {
            let version = version_regex.captures(&lower).map(|caps| caps[1].to_string());
            findings.push(TechnologyFinding::new(*cms, version, Confidence::High));
        }
    }

    findings
}

/// Library ids worth reporting from a script filename alone.
const SCRIPT_SRC_LIBS: &[&str] = &[
    "jquery",
    "bootstrap",
    "vue",
    "react",
    "angular",
    "angularjs",
    "moment",
    "lodash",
    "underscore",
    "backbone",
    "knockout",
];

/// Filename-and-version shape, e.g. "jquery-3.6.0.min.js". The name group
/// is lazy so the whole dotted version stays in the version group instead
/// of the major digit being swallowed by the filename.
static SCRIPT_SRC_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z][a-zA-Z0-9-]*?)[.-](\d+\.\d+(?:\.\d+)?)")
        .expect("script src pattern must compile")
});

fn detect_script_src_versions(tab: &Tab) -> Result<Vec<TechnologyFinding>> {
    let sources: Vec<String> = eval_json(
        tab,
        r#"JSON.stringify(
            Array.from(document.querySelectorAll('script[src]')).map(script => script.src)
        )"#,
    )?;

    Ok(sources
        .iter()
        .filter_map(|src| parse_script_src(src))
        .collect())
}

/// Extract a known library and version from one script src URL.
pub(crate) fn parse_script_src(src: &str) -> Option<TechnologyFinding> {
    let caps = SCRIPT_SRC_VERSION.captures(src)?;
    let mut name = caps[1].to_lowercase();
    let version = caps[2].to_string();

    // Normalize common library names out of their filename variants
    if name.contains("jquery") && !name.contains("ui") {
        name = "jquery".to_string();
    } else if name.contains("bootstrap") {
        name = "bootstrap".to_string();
    } else if name.contains("vue") {
        name = "vue".to_string();
    } else if name.contains("react") {
        name = "react".to_string();
    } else if name.contains("angular") {
        name = "angular".to_string();
    }

    if SCRIPT_SRC_LIBS.contains(&name.as_str()) {
        Some(TechnologyFinding::new(name, Some(version), Confidence::Medium))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_with_version() {
        let findings = parse_generator_content("WordPress 6.4.2");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "wordpress");
        assert_eq!(findings[0].version.as_deref(), Some("6.4.2"));
        assert_eq!(findings[0].confidence, Confidence::High);
    }

    #[test]
    fn test_generator_without_dotted_version() {
        // "Drupal 9" has no minor component, so no version is extracted
        let findings = parse_generator_content("Drupal 9 (https://www.drupal.org)");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "drupal");
        assert_eq!(findings[0].version, None);
    }

    #[test]
    fn test_generator_unknown_content() {
        assert!(parse_generator_content("Custom Site Builder 2.0").is_empty());
    }

    #[test]
    fn test_script_src_known_library() {
        let finding = parse_script_src("https://code.jquery.com/jquery-3.6.0.min.js").unwrap();
        assert_eq!(finding.name, "jquery");
        assert_eq!(finding.version.as_deref(), Some("3.6.0"));
        assert_eq!(finding.confidence, Confidence::Medium);
    }

    #[test]
    fn test_script_src_jquery_ui_is_not_jquery() {
        // "jquery-ui" keeps its own name and is not in the allowlist
        assert!(parse_script_src("/assets/jquery-ui-1.12.1.min.js").is_none());
    }

    #[test]
    fn test_script_src_normalizes_bundled_names() {
        let finding = parse_script_src("/js/vue-router.3.5.2.js").unwrap();
        assert_eq!(finding.name, "vue");
        assert_eq!(finding.version.as_deref(), Some("3.5.2"));
    }

    #[test]
    fn test_script_src_unknown_library() {
        assert!(parse_script_src("/js/analytics-2.1.0.min.js").is_none());
    }

    #[test]
    fn test_script_src_without_version() {
        assert!(parse_script_src("/js/jquery.min.js").is_none());
    }
}
