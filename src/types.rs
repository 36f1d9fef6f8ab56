// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Diagnosis Data Model
 * Result records produced by one website diagnosis run
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};

/// How certain a detection signal is about a technology being present.
///
/// Runtime introspection yields High/Medium, static markup matching always
/// yields Low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// One identified technology. `name` is a canonical lowercase id from the
/// detection catalog (e.g. "jquery", "nextjs"), `version` a dotted numeric
/// string when one could be extracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechnologyFinding {
    pub name: String,
    pub version: Option<String>,
    pub confidence: Confidence,
}

impl TechnologyFinding {
    pub fn new(name: impl Into<String>, version: Option<String>, confidence: Confidence) -> Self {
        Self {
            name: name.into(),
            version,
            confidence,
        }
    }
}

/// Fusion output: technology identity only. Confidence is an input to the
/// merge, not part of the merged record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedTechnology {
    pub name: String,
    pub version: Option<String>,
}

/// One vulnerable-library signature hit. `vuln_type` is the signature id
/// from the catalog (often more granular than a technology id, e.g.
/// "angularjs_v1_5"), `version` is "unknown" when not extractable, and
/// `matched_text` keeps up to 100 chars of raw source at the match site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VulnerabilityFinding {
    #[serde(rename = "type")]
    pub vuln_type: String,
    pub version: String,
    pub matched_text: String,
}

/// Terminal classification of one diagnosis run. `Unknown` exists only as
/// the initial state; a returned result always carries one of the four
/// terminal values, assigned exactly once at the end of the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    Unknown,
    Clean,
    AtRisk,
    Timeout,
    Error,
}

impl DiagnosisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisStatus::Unknown => "unknown",
            DiagnosisStatus::Clean => "clean",
            DiagnosisStatus::AtRisk => "at_risk",
            DiagnosisStatus::Timeout => "timeout",
            DiagnosisStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DiagnosisStatus::Unknown)
    }
}

impl std::fmt::Display for DiagnosisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The aggregate record for one diagnosis run.
///
/// Created empty at the start of a run, mutated only by that run's
/// components, and treated as immutable by every downstream consumer once
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub url: String,
    pub domain: String,
    pub tech: String,
    pub status: DiagnosisStatus,
    pub load_time: String,
    pub first_contentful_paint_ms: Option<u64>,
    pub console_errors: Vec<String>,
    pub console_error_count: usize,
    pub vulnerabilities: Vec<VulnerabilityFinding>,
    pub vulnerability_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_observation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosisResult {
    /// Empty record at the start of one run.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: String::new(),
            tech: String::new(),
            status: DiagnosisStatus::Unknown,
            load_time: String::new(),
            first_contentful_paint_ms: None,
            console_errors: Vec::new(),
            console_error_count: 0,
            vulnerabilities: Vec::new(),
            vulnerability_detected: false,
            technical_observation: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::Low);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DiagnosisStatus::AtRisk).unwrap(),
            "\"at_risk\""
        );
        assert_eq!(DiagnosisStatus::AtRisk.to_string(), "at_risk");
    }

    #[test]
    fn test_new_result_is_empty_and_unknown() {
        let result = DiagnosisResult::new("https://example.com");
        assert_eq!(result.status, DiagnosisStatus::Unknown);
        assert!(!result.status.is_terminal());
        assert!(result.console_errors.is_empty());
        assert!(result.vulnerabilities.is_empty());
        assert!(!result.vulnerability_detected);
    }

    #[test]
    fn test_vulnerability_finding_serializes_type_field() {
        let finding = VulnerabilityFinding {
            vuln_type: "angularjs_v1_5".to_string(),
            version: "1.5".to_string(),
            matched_text: "angular.min.js?v=1.5".to_string(),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "angularjs_v1_5");
        assert_eq!(json["version"], "1.5");
    }

    #[test]
    fn test_optional_fields_skipped_when_absent() {
        let result = DiagnosisResult::new("https://example.com");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("technical_observation").is_none());
    }
}
