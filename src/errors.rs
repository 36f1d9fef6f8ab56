// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Diagnosis Error Types
 * Production-ready error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::DiagnosisStatus;
use thiserror::Error;

/// Failure taxonomy for one diagnosis run.
///
/// Nothing here terminates the process: every variant degrades to a valid
/// result record. `NavigationTimeout` and `RuntimeFault` decide the
/// terminal status; `DetectorFault` and `ObservationFault` are isolated at
/// their call sites and only logged.
#[derive(Error, Debug)]
pub enum DiagnosisError {
    /// Both navigation wait tiers exhausted
    #[error("Page load timeout after {waited_secs} seconds")]
    NavigationTimeout { waited_secs: u64 },

    /// Browser session could not be created or driven
    #[error("Browser session error: {0}")]
    Browser(String),

    /// One introspection detector failed; siblings keep running
    #[error("Detector '{detector}' failed: {reason}")]
    DetectorFault {
        detector: &'static str,
        reason: String,
    },

    /// Advisory-generation collaborator failed; the run proceeds without it
    #[error("Observation generation failed: {0}")]
    ObservationFault(String),

    /// Any other unhandled fault during a run
    #[error("{0}")]
    RuntimeFault(String),
}

impl DiagnosisError {
    /// Terminal status this fault maps the run to, if it ends the run at
    /// all. Isolated faults return `None`.
    pub fn terminal_status(&self) -> Option<DiagnosisStatus> {
        match self {
            DiagnosisError::NavigationTimeout { .. } => Some(DiagnosisStatus::Timeout),
            DiagnosisError::Browser(_) | DiagnosisError::RuntimeFault(_) => {
                Some(DiagnosisStatus::Error)
            }
            DiagnosisError::DetectorFault { .. } | DiagnosisError::ObservationFault(_) => None,
        }
    }

    /// Whether this fault ends the run (as opposed to being isolated and
    /// logged where it happened).
    pub fn is_fatal_to_run(&self) -> bool {
        self.terminal_status().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_timeout_status() {
        let err = DiagnosisError::NavigationTimeout { waited_secs: 60 };
        assert_eq!(err.terminal_status(), Some(DiagnosisStatus::Timeout));
        assert!(err.is_fatal_to_run());
    }

    #[test]
    fn test_runtime_fault_maps_to_error_status() {
        let err = DiagnosisError::RuntimeFault("boom".to_string());
        assert_eq!(err.terminal_status(), Some(DiagnosisStatus::Error));
    }

    #[test]
    fn test_isolated_faults_do_not_end_the_run() {
        let detector = DiagnosisError::DetectorFault {
            detector: "jquery-global",
            reason: "evaluation failed".to_string(),
        };
        let observation = DiagnosisError::ObservationFault("provider down".to_string());
        assert!(!detector.is_fatal_to_run());
        assert!(!observation.is_fatal_to_run());
    }

    #[test]
    fn test_timeout_message_names_the_wait() {
        let err = DiagnosisError::NavigationTimeout { waited_secs: 30 };
        assert_eq!(err.to_string(), "Page load timeout after 30 seconds");
    }
}
