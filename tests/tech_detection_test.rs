// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Technology Detection Tests
 * Static matching, fusion and label derivation over rendered markup
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use luotain::fusion::{merge_detected_techs, primary_label};
use luotain::static_matcher::detect_technologies_static;
use luotain::types::{Confidence, TechnologyFinding};

#[test]
fn test_static_detection_feeds_merge_and_label() {
    let markup = r#"
        <html>
        <head>
            <link rel="stylesheet" href="/wp-content/themes/shop/style.css">
        </head>
        <body>
            <script src="/wp-includes/js/jquery/jquery.min.js"></script>
        </body>
        </html>
    "#;

    let static_techs = detect_technologies_static(markup);
    assert!(static_techs.iter().any(|t| t.name == "wordpress"));
    assert!(static_techs.iter().any(|t| t.name == "jquery"));

    let merged = merge_detected_techs(&[], &static_techs);
    let names: Vec<&str> = merged.iter().map(|t| t.name.as_str()).collect();
    // Multiple catalog hits per technology collapse to one merged entry
    assert_eq!(names.iter().filter(|n| **n == "wordpress").count(), 1);

    let label = primary_label(&merged, &[]);
    assert_eq!(label, "WordPress, jQuery", "CMS outranks the utility library");
}

#[test]
fn test_runtime_finding_wins_merge_but_static_fills_version() {
    let runtime = vec![TechnologyFinding::new("react", None, Confidence::High)];
    let statically = vec![TechnologyFinding::new(
        "react",
        Some("16.3.0".to_string()),
        Confidence::Low,
    )];

    let merged = merge_detected_techs(&runtime, &statically);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "react");
    assert_eq!(merged[0].version.as_deref(), Some("16.3.0"));
}

#[test]
fn test_runtime_version_is_authoritative() {
    let runtime = vec![TechnologyFinding::new(
        "jquery",
        Some("3.6.0".to_string()),
        Confidence::High,
    )];
    // A stale versioned hit in markup must not override the runtime version
    let statically = vec![TechnologyFinding::new(
        "jquery",
        Some("1.8.3".to_string()),
        Confidence::Low,
    )];

    let merged = merge_detected_techs(&runtime, &statically);
    assert_eq!(merged[0].version.as_deref(), Some("3.6.0"));
}

#[test]
fn test_versioned_static_match_reported_for_angularjs() {
    let markup = r#"<script src="/js/angular.min.js/1.5.11/angular.min.js"></script>"#;
    let static_techs = detect_technologies_static(markup);
    let angularjs = static_techs
        .iter()
        .find(|t| t.name == "angularjs")
        .expect("Should detect AngularJS");
    assert_eq!(angularjs.version.as_deref(), Some("1.5.11"));
    assert_eq!(angularjs.confidence, Confidence::Low);
}

#[test]
fn test_label_caps_and_orders_mixed_detections() {
    let markup = r#"
        <div id="__next"></div>
        <script src="/_next/static/chunks/main.js"></script>
        <link href="bootstrap.min.css" rel="stylesheet">
        <script src="jquery.min.js"></script>
        <script src="/sites/default/files/js/drupal.js"></script>
    "#;

    let merged = merge_detected_techs(&[], &detect_technologies_static(markup));
    let label = primary_label(&merged, &[]);

    let parts: Vec<&str> = label.split(", ").collect();
    assert!(parts.len() <= 3, "label is capped at three names: {label}");
    assert_eq!(parts[0], "Next.js", "framework leads the label: {label}");
}

#[test]
fn test_plain_page_detects_nothing() {
    let markup = "<html><body><h1>Hello</h1><p>Plain old HTML.</p></body></html>";
    let static_techs = detect_technologies_static(markup);
    assert!(static_techs.is_empty());
    assert_eq!(primary_label(&merge_detected_techs(&[], &static_techs), &[]), "Unknown");
}
