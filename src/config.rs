// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Diagnosis Configuration
 * Per-engine settings with validation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiagnosisConfig {
    /// Run Chromium headless. Disable only for local debugging.
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Tier-1 navigation wait: full page load.
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Tier-2 navigation wait: markup parsed, used after tier 1 expires.
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_dom_ready_timeout")]
    pub dom_ready_timeout_secs: u64,

    /// Ceiling on waiting for a first-contentful-paint entry.
    #[validate(range(min = 100, max = 60000))]
    #[serde(default = "default_fcp_wait")]
    pub fcp_wait_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_dom_ready_timeout() -> u64 {
    30
}

fn default_fcp_wait() -> u64 {
    5000
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout_secs: default_navigation_timeout(),
            dom_ready_timeout_secs: default_dom_ready_timeout(),
            fcp_wait_ms: default_fcp_wait(),
        }
    }
}

impl DiagnosisConfig {
    /// Worst-case wall time spent waiting on navigation alone.
    pub fn total_navigation_budget_secs(&self) -> u64 {
        self.navigation_timeout_secs + self.dom_ready_timeout_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagnosisConfig::default();
        assert!(config.headless);
        assert_eq!(config.navigation_timeout_secs, 30);
        assert_eq!(config.dom_ready_timeout_secs, 30);
        assert_eq!(config.fcp_wait_ms, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_missing_fields_on_deserialize() {
        let config: DiagnosisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.navigation_timeout_secs, 30);
        assert!(config.headless);
    }

    #[test]
    fn test_out_of_range_timeout_fails_validation() {
        let config = DiagnosisConfig {
            navigation_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_navigation_budget_sums_both_tiers() {
        let config = DiagnosisConfig::default();
        assert_eq!(config.total_navigation_budget_secs(), 60);
    }
}
