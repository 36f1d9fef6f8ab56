// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Static detection catalogs.
//!
//! Two ordered tables, compiled once and shared read-only by every
//! diagnosis run:
//! - technology identification patterns (broad, low precision)
//! - vulnerability signatures (narrow, version-bounded)

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// One version-bounded vulnerability signature.
pub struct VulnSignature {
    pub key: &'static str,
    pub regex: Regex,
}

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("catalog pattern must compile")
}

/// Raw vulnerability signatures. Keys ending in a specific version are
/// narrow; `*_old` keys are broader fallbacks for the same technology.
const RAW_VULNERABLE_PATTERNS: &[(&str, &str)] = &[
    // Next.js < 13
    ("nextjs_old", r"(?:_next/static/|next\.js[^/]*?@?)(1\.[0-9]\.|^1[0-2]\.)"),
    // AngularJS 1.x
    ("angularjs_v1_5", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.5"),
    ("angularjs_v1_4", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.4"),
    ("angularjs_v1_3", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.3"),
    ("angularjs_v1_2", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.2"),
    ("angularjs_v1_1", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.1"),
    ("angularjs_v1_0", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.0"),
    ("angularjs_old", r"angular(?:js)?(?:-|\.min)?\.js\?v?=1\.[0-6]"),
    // jQuery < 1.12 - matches the core file pattern, not the bare word
    ("jquery_old", r"jquery[.-](?:1\.([0-9]|1[0-1]))(?:\.|\b)"),
    // Bootstrap < 3.5
    ("bootstrap_old", r"bootstrap(?:-|\.min)?\.(?:js|css)[^/]*?3\.[0-4]"),
    // React < 16.8
    ("react_old", r"react(?:-dom)?(?:-|\.min)?\.js[^/]*?(?:0\.|1[0-5]\.|16\.[0-7]\b)"),
    // Vue.js < 2.6
    ("vue_old", r"vue(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.[0-5])"),
    // Backbone.js < 1.4
    ("backbone_old", r"backbone(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-3])"),
    // Ember.js < 2.18 - word boundary avoids 'emberSupport' etc
    ("ember_old", r"\bember(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.[0-1][0-7])"),
    // Knockout.js < 3.5
    ("knockout_old", r"knockout(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.[0-4])"),
    // Dojo Toolkit < 1.14
    ("dojo_old", r"dojo(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-1][0-3])"),
    // Prototype.js < 1.7.3
    ("prototype_old", r"prototype(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-6]\.|1\.7\.[0-2])"),
    // MooTools < 1.6
    ("mootools_old", r"mootools(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-5])"),
    // YUI < 3.18
    ("yui_old", r"yui(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.[0-1][0-7])"),
    // ExtJS < 6.2
    ("extjs_old", r"ext(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.|4\.|5\.|6\.[0-1])"),
    // Underscore.js < 1.9
    ("underscore_old", r"underscore(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-8])"),
    // Lodash < 4.17
    ("lodash_old", r"lodash(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.|4\.[0-1][0-6])"),
    // jQuery UI < 1.12
    ("jquery_ui_old", r"jquery-ui(?:-|\.min)?\.js[^/]*?(?:0\.|1\.[0-1][0-1])"),
    // WordPress core assets below 6.2
    ("wordpress_old", r"wp-includes/.*?ver=(?:[0-4]\.|5\.[0-9]\.|6\.[0-1]\.)"),
    // Drupal < 8
    ("drupal_old", r"drupal\.js.*?v?(?:[0-7]\.)"),
    // Joomla < 3.9
    ("joomla_old", r"joomla.*?v?(?:[0-2]\.|3\.[0-8])"),
    // Handlebars < 4.0
    ("handlebars_old", r"handlebars(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.)"),
    // Mustache.js < 3.0
    ("mustache_old", r"mustache(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.)"),
    // Marionette.js < 4.0
    ("marionette_old", r"marionette(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.|3\.)"),
    // RequireJS < 2.3
    ("requirejs_old", r"require(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.[0-2])"),
    // Socket.io < 2.0
    ("socketio_old", r"socket\.io(?:-|\.min)?\.js[^/]*?(?:0\.|1\.)"),
    // Modernizr < 3.0
    ("modernizr_old", r"modernizr(?:-|\.min)?\.js[^/]*?(?:0\.|1\.|2\.)"),
];

/// Vulnerability signatures in scan order: specific (non-`old`) keys before
/// broad `old` fallbacks, lexical within each group. The scanner relies on
/// this order so a narrow signature claims a dedup key before a broad one
/// can.
pub static VULNERABLE_PATTERNS: Lazy<Vec<VulnSignature>> = Lazy::new(|| {
    let mut signatures: Vec<VulnSignature> = RAW_VULNERABLE_PATTERNS
        .iter()
        .map(|(key, pattern)| VulnSignature {
            key,
            regex: compile(pattern),
        })
        .collect();
    signatures.sort_by_key(|s| (s.key.contains("old"), s.key));
    signatures
});

/// Raw technology identification patterns, broader than the vulnerability
/// signatures. Canonical lowercase technology id -> markup pattern.
const RAW_TECH_DETECTION_PATTERNS: &[(&str, &str)] = &[
    ("angularjs", r"angular(?:js|\.js|\.min\.js)"),
    ("angular", r"@angular/|angular\.js|angularjs"),
    ("react", r"react(?:\.js|\.min\.js|/)|react-dom"),
    ("vue", r"vue(?:\.js|\.min\.js|\.runtime)"),
    ("nextjs", r"_next/|next\.js|__next"),
    ("nuxt", r"_nuxt/|nuxt\.js"),
    ("svelte", r"svelte|svelte\.js"),
    ("jquery", r"jquery(?:\.min)?\.js"),
    ("backbone", r"backbone(?:\.min)?\.js"),
    ("ember", r"ember(?:\.js|\.min\.js)"),
    ("knockout", r"knockout(?:\.min)?\.js"),
    ("dojo", r"dojo(?:\.js|\.min\.js)"),
    ("prototype", r"prototype(?:\.js|\.min\.js)"),
    ("mootools", r"mootools(?:\.js|\.min\.js)"),
    ("yui", r"yui(?:\.js|\.min\.js)"),
    ("extjs", r"ext(?:\.js|\.min\.js)"),
    ("underscore", r"underscore(?:\.min)?\.js"),
    ("lodash", r"lodash(?:\.min)?\.js"),
    ("moment", r"moment(?:\.min)?\.js"),
    ("jquery_ui", r"jquery-ui|jqueryui"),
    ("bootstrap", r"bootstrap(?:\.min)?\.(?:js|css)"),
    ("wordpress", r"wp-content|wp-includes|wp-admin|wordpress"),
    ("drupal", r"drupal\.js|sites/default"),
    ("joomla", r"joomla|components/com_"),
    ("magento", r"magento|skin/frontend"),
    ("shopify", r"cdn\.shopify|shopify"),
    ("woocommerce", r"woocommerce"),
    ("aspnet", r"asp\.net|aspx|viewstate|__doPostBack"),
    ("php", r"\.php\?|x-powered-by.*php"),
    // The bare words would fire on prose, keep these anchored to artifacts
    ("rails", r"ruby.*on.*rails"),
    ("django", r"csrfmiddlewaretoken"),
    ("laravel", r"laravel|_token"),
    ("express", r"express\.js"),
    ("socketio", r"socket\.io"),
    ("handlebars", r"handlebars(?:\.min)?\.js"),
    ("mustache", r"mustache(?:\.min)?\.js"),
    ("marionette", r"marionette(?:\.min)?\.js"),
    ("requirejs", r"require(?:\.min)?\.js"),
    ("fontawesome", r"font-awesome|fontawesome"),
    ("modernizr", r"modernizr(?:\.min)?\.js"),
];

/// Technology identification catalog in definition order.
pub static TECH_DETECTION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    RAW_TECH_DETECTION_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, compile(pattern)))
        .collect()
});

/// Dotted numeric version, e.g. "1.12" or "1.12.4".
pub static BARE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("version pattern must compile"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_compile() {
        assert_eq!(VULNERABLE_PATTERNS.len(), RAW_VULNERABLE_PATTERNS.len());
        assert_eq!(TECH_DETECTION_PATTERNS.len(), RAW_TECH_DETECTION_PATTERNS.len());
    }

    #[test]
    fn test_vulnerable_patterns_scan_order() {
        let keys: Vec<&str> = VULNERABLE_PATTERNS.iter().map(|s| s.key).collect();
        let first_old = keys
            .iter()
            .position(|k| k.contains("old"))
            .expect("catalog has old signatures");
        // Specific signatures come first, broad fallbacks after
        assert!(keys[..first_old].iter().all(|k| !k.contains("old")));
        assert!(keys[first_old..].iter().all(|k| k.contains("old")));
        // Lexical within each group
        let mut specific = keys[..first_old].to_vec();
        specific.sort_unstable();
        assert_eq!(specific, keys[..first_old]);
        let mut broad = keys[first_old..].to_vec();
        broad.sort_unstable();
        assert_eq!(broad, keys[first_old..]);
    }

    #[test]
    fn test_angularjs_signature_matches_versioned_script() {
        let sig = VULNERABLE_PATTERNS
            .iter()
            .find(|s| s.key == "angularjs_v1_5")
            .unwrap();
        assert!(sig.regex.is_match("angular.min.js?v=1.5"));
        assert!(sig.regex.is_match("angularjs.js?=1.5"));
        assert!(!sig.regex.is_match("angular.min.js?v=1.8"));
    }

    #[test]
    fn test_jquery_signature_requires_core_file_shape() {
        let sig = VULNERABLE_PATTERNS
            .iter()
            .find(|s| s.key == "jquery_old")
            .unwrap();
        assert!(sig.regex.is_match("jquery-1.8.3.min.js"));
        assert!(sig.regex.is_match("jquery.1.11.0.js"));
        // Plugin filenames without a version directly after "jquery" never match
        assert!(!sig.regex.is_match("jquery.validate.min.js"));
        // 1.12+ is out of the vulnerable range
        assert!(!sig.regex.is_match("jquery-1.12.4.min.js"));
        assert!(!sig.regex.is_match("jquery-3.6.0.min.js"));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let (_, regex) = TECH_DETECTION_PATTERNS
            .iter()
            .find(|(name, _)| *name == "wordpress")
            .unwrap();
        assert!(regex.is_match("WP-Content/themes"));
    }

    #[test]
    fn test_bare_version_extracts_first_dotted_number() {
        let caps = BARE_VERSION.captures("jquery-1.8.3.min.js").unwrap();
        assert_eq!(&caps[1], "1.8.3");
        assert!(BARE_VERSION.captures("no digits here").is_none());
    }
}
