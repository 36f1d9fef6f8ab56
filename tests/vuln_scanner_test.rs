// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Vulnerability Scanner Tests
 * Signature scanning, dedup keys and the jQuery plugin guard
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use luotain::vuln_scanner::scan_vulnerabilities;

#[test]
fn test_jquery_plugin_alone_yields_no_findings() {
    let markup = r#"
        <html><body>
            <script src="jquery.validate.min.js"></script>
        </body></html>
    "#;
    let findings = scan_vulnerabilities(markup);
    assert!(
        findings.iter().all(|f| !f.vuln_type.contains("jquery")),
        "plugin file must not be reported as the core library"
    );
}

#[test]
fn test_old_jquery_core_file_yields_one_finding() {
    let markup = r#"
        <html><body>
            <script src="jquery-1.8.3.min.js"></script>
        </body></html>
    "#;
    let findings = scan_vulnerabilities(markup);
    let jquery: Vec<_> = findings
        .iter()
        .filter(|f| f.vuln_type.contains("jquery"))
        .collect();
    assert_eq!(jquery.len(), 1, "exactly one jQuery finding expected");
    assert_eq!(jquery[0].version, "1.8.3");
}

#[test]
fn test_angularjs_same_version_twice_deduplicates() {
    let markup = r#"
        <script src="/assets/angular.min.js?v=1.5"></script>
        <div>content between the two tags</div>
        <script src="/cdn/angular.min.js?v=1.5"></script>
    "#;
    let findings = scan_vulnerabilities(markup);
    let angular: Vec<_> = findings
        .iter()
        .filter(|f| f.vuln_type.contains("angularjs"))
        .collect();
    assert_eq!(angular.len(), 1, "same version must collapse to one finding");
    assert_eq!(angular[0].version, "1.5");
}

#[test]
fn test_scanning_twice_yields_identical_findings() {
    let markup = r#"
        <script src="jquery-1.8.3.min.js"></script>
        <script src="angular.min.js?v=1.3"></script>
        <script src="/wp-includes/js/common.js?ver=5.4.2"></script>
        <script src="knockout.min.js/3.2.0/knockout.min.js"></script>
    "#;
    let first = scan_vulnerabilities(markup);
    let second = scan_vulnerabilities(markup);
    assert_eq!(first, second);
    assert!(first.len() >= 3);
}

#[test]
fn test_evidence_excerpt_is_bounded_and_raw() {
    let markup = r#"<script src="Angular.Min.js?v=1.2"></script>"#;
    let findings = scan_vulnerabilities(markup);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert!(finding.matched_text.chars().count() <= 100);
    // Original casing from the page survives into the evidence
    assert!(finding.matched_text.starts_with("Angular.Min.js"));
}

#[test]
fn test_mixed_page_reports_each_technology_once() {
    let markup = r#"
        <html><head>
            <script src="/libs/jquery-1.9.0.min.js"></script>
            <script src="/libs/jquery-1.9.0.min.js?cache=1"></script>
            <script src="angular.min.js?v=1.4"></script>
        </head></html>
    "#;
    let findings = scan_vulnerabilities(markup);

    let jquery_count = findings.iter().filter(|f| f.vuln_type == "jquery_old").count();
    let angular_count = findings
        .iter()
        .filter(|f| f.vuln_type.contains("angularjs"))
        .count();
    assert_eq!(jquery_count, 1);
    assert_eq!(angular_count, 1);
}
