// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Overall risk classification.
//!
//! One diagnosis run ends in exactly one terminal status. The timeout and
//! error short-circuits live in the engine; this module only decides
//! between `Clean` and `AtRisk` for runs that completed.

use crate::types::{DiagnosisStatus, VulnerabilityFinding};

/// First-contentful-paint above this is slow enough to flag on its own.
pub const SLOW_FCP_THRESHOLD_MS: u64 = 3000;

/// Classify a completed run.
///
/// Any console error or vulnerability makes the site `AtRisk`; otherwise a
/// known FCP strictly above the threshold does; otherwise the site is
/// `Clean`. An unknown FCP never flags.
pub fn classify(
    console_errors: &[String],
    vulnerabilities: &[VulnerabilityFinding],
    fcp_ms: Option<u64>,
) -> DiagnosisStatus {
    if !console_errors.is_empty() || !vulnerabilities.is_empty() {
        return DiagnosisStatus::AtRisk;
    }
    if let Some(fcp) = fcp_ms {
        if fcp > SLOW_FCP_THRESHOLD_MS {
            return DiagnosisStatus::AtRisk;
        }
    }
    DiagnosisStatus::Clean
}
