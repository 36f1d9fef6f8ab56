// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Technology Fusion & Ranking
 * Merges runtime and static detections; derives the primary tech label
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::{MergedTechnology, TechnologyFinding, VulnerabilityFinding};
use std::collections::HashMap;

/// Canonical technology id -> display name. Order is significant: the
/// vulnerability-fallback label picks the first id that is a substring of
/// the signature key.
const TECH_NAME_MAP: &[(&str, &str)] = &[
    ("angularjs", "AngularJS"),
    ("angular", "Angular"),
    ("jquery", "jQuery"),
    ("bootstrap", "Bootstrap"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("nextjs", "Next.js"),
    ("nuxt", "Nuxt.js"),
    ("svelte", "Svelte"),
    ("backbone", "Backbone.js"),
    ("ember", "Ember.js"),
    ("knockout", "Knockout.js"),
    ("dojo", "Dojo Toolkit"),
    ("prototype", "Prototype.js"),
    ("mootools", "MooTools"),
    ("yui", "YUI"),
    ("extjs", "ExtJS"),
    ("underscore", "Underscore.js"),
    ("lodash", "Lodash"),
    ("moment", "Moment.js"),
    ("jquery_ui", "jQuery UI"),
    ("wordpress", "WordPress"),
    ("drupal", "Drupal"),
    ("joomla", "Joomla"),
    ("magento", "Magento"),
    ("shopify", "Shopify"),
    ("woocommerce", "WooCommerce"),
    ("aspnet", "ASP.NET"),
    ("php", "PHP"),
    ("rails", "Ruby on Rails"),
    ("django", "Django"),
    ("laravel", "Laravel"),
    ("handlebars", "Handlebars"),
    ("mustache", "Mustache.js"),
    ("marionette", "Marionette.js"),
    ("requirejs", "RequireJS"),
    ("socketio", "Socket.io"),
    ("express", "Express.js"),
    ("fontawesome", "Font Awesome"),
    ("modernizr", "Modernizr"),
];

/// Label ranking: frameworks and platforms above utility libraries.
/// Earlier entries rank higher; ids not listed rank below all of these.
const PRIORITY_ORDER: &[&str] = &[
    "nextjs", "nuxt", "react", "vue", "angular", "angularjs", "svelte",
    "wordpress", "drupal", "joomla", "magento", "shopify", "rails",
    "django", "laravel", "aspnet", "php", "express", "ember", "backbone",
    "bootstrap", "jquery",
];

/// Cap on distinct names in the human-readable label.
const MAX_LABEL_NAMES: usize = 3;

/// Merge runtime-introspection findings with static-matcher findings into
/// one deduplicated, name-keyed technology list.
///
/// Runtime findings fold in first, static ones after; a later finding only
/// upgrades an existing entry from unversioned to versioned, never the
/// other way. Confidence does not survive the merge.
pub fn merge_detected_techs(
    runtime: &[TechnologyFinding],
    statically: &[TechnologyFinding],
) -> Vec<MergedTechnology> {
    let mut merged: Vec<MergedTechnology> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for finding in runtime.iter().chain(statically.iter()) {
        match index.get(&finding.name) {
            Some(&at) => {
                if finding.version.is_some() && merged[at].version.is_none() {
                    merged[at].version = finding.version.clone();
                }
            }
            None => {
                index.insert(finding.name.clone(), merged.len());
                merged.push(MergedTechnology {
                    name: finding.name.clone(),
                    version: finding.version.clone(),
                });
            }
        }
    }

    merged
}

fn display_name(id: &str) -> String {
    TECH_NAME_MAP
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| title_case(id))
}

/// Fallback rendering for ids outside the display table: uppercase the
/// first letter of each alphabetic run ("jquery_ui" -> "Jquery_Ui").
fn title_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut start_of_word = true;
    for c in id.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}

fn priority_score(id: &str) -> usize {
    PRIORITY_ORDER
        .iter()
        .position(|p| *p == id)
        .map(|at| PRIORITY_ORDER.len() - at)
        .unwrap_or(0)
}

/// Derive the human-readable `tech` label.
///
/// Detected technologies win: rank by the framework-priority table, render
/// up to three distinct display names with versions. With no technologies,
/// fall back to the first vulnerability's signature id mapped through the
/// same display table. Otherwise "Unknown".
pub fn primary_label(merged: &[MergedTechnology], vulnerabilities: &[VulnerabilityFinding]) -> String {
    if !merged.is_empty() {
        let mut ranked: Vec<&MergedTechnology> = merged.iter().collect();
        ranked.sort_by(|a, b| priority_score(&b.name).cmp(&priority_score(&a.name)));

        let mut formatted: Vec<String> = Vec::new();
        for tech in ranked {
            if formatted.len() >= MAX_LABEL_NAMES {
                break;
            }
            let mut name = display_name(&tech.name);
            if let Some(version) = &tech.version {
                name = format!("{name} {version}");
            }
            // "React" after "React 16.3.0" is a duplicate, not new signal
            let first_word = name.split_whitespace().next().unwrap_or(&name).to_string();
            if !formatted.iter().any(|existing| existing.contains(&first_word)) {
                formatted.push(name);
            }
        }

        if !formatted.is_empty() {
            return formatted.join(", ");
        }
    }

    if let Some(first) = vulnerabilities.first() {
        let key_lower = first.vuln_type.to_lowercase();
        let mut tech_name = "Unknown".to_string();
        for (id, name) in TECH_NAME_MAP {
            if key_lower.contains(id) {
                tech_name = (*name).to_string();
                break;
            }
        }
        if first.version != "unknown" {
            tech_name = format!("{tech_name} {}", first.version);
        }
        return tech_name;
    }

    "Unknown".to_string()
}
