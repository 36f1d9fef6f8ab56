// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Advisory-observation collaborator boundary.
//!
//! An external generator (typically LLM-backed) turns the headline numbers
//! of a finished diagnosis into a short technical observation. It is
//! strictly optional: failures are logged and swallowed, never allowed to
//! abort the run that produced the result.

use crate::errors::DiagnosisError;
use crate::types::DiagnosisResult;
use anyhow::Result;
use tracing::{info, warn};

/// The slice of a diagnosis the generator is allowed to see.
#[derive(Debug, Clone)]
pub struct ObservationInput {
    pub tech: String,
    pub console_error_count: usize,
    pub load_time: String,
}

impl ObservationInput {
    pub fn from_result(result: &DiagnosisResult) -> Self {
        Self {
            tech: result.tech.clone(),
            console_error_count: result.console_error_count,
            load_time: result.load_time.clone(),
        }
    }
}

/// Produces a short advisory string for a diagnosis, or nothing.
#[async_trait::async_trait]
pub trait ObservationGenerator: Send + Sync {
    async fn generate(&self, input: &ObservationInput) -> Result<Option<String>>;

    /// Generator name for display
    fn name(&self) -> &str;
}

/// Run the generator against a finished result and attach its output.
/// Generator failures leave the result untouched.
pub async fn attach_observation(
    generator: &dyn ObservationGenerator,
    result: &mut DiagnosisResult,
) {
    let input = ObservationInput::from_result(result);
    match generator.generate(&input).await {
        Ok(Some(observation)) => {
            info!("[Observe] Technical observation generated by {}", generator.name());
            result.technical_observation = Some(observation);
        }
        Ok(None) => {}
        Err(e) => {
            let fault = DiagnosisError::ObservationFault(e.to_string());
            warn!("[Observe] {}", fault);
        }
    }
}
