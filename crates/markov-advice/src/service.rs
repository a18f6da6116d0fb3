//! The advice service: five symptom findings in, one advice text out.

use std::path::{Path, PathBuf};

use markov_core::{EvidenceCase, EvidenceError};
use markov_infer::{Advice, InferenceError, OptimalIntervention};
use markov_pgmx::{IoError, PgmxReader};
use tracing::{debug, error, info};

use crate::error::AdviceError;
use crate::request::{AdviceRequest, BnInput};

/// Why a calculation failed. Logged, never returned.
#[derive(Debug, thiserror::Error)]
enum CoreFailure {
    #[error(transparent)]
    Model(#[from] IoError),
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Computes advice against an influence diagram stored on disk.
///
/// The model is read afresh for every request, so a replaced file takes
/// effect on the next call and requests share no state.
#[derive(Debug, Clone)]
pub struct AdviceService {
    model_path: PathBuf,
}

impl AdviceService {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Validate a raw request, then calculate its advice.
    pub fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        info!("advice request received");
        let input = request.validate()?;
        self.calculate_advice(&input)
    }

    /// Enter the findings, evaluate the model and read the advice off the
    /// optimal strategy.
    pub fn calculate_advice(&self, input: &BnInput) -> Result<String, AdviceError> {
        match self.evaluate(input) {
            Ok(advice) => Ok(advice.text),
            Err(e) => {
                error!(
                    model = %self.model_path.display(),
                    error = %e,
                    "failed to calculate advice"
                );
                Err(AdviceError::Internal)
            }
        }
    }

    fn evaluate(&self, input: &BnInput) -> Result<Advice, CoreFailure> {
        let model = PgmxReader::load(&self.model_path)?;
        let mut evidence = EvidenceCase::new();
        for (variable, state) in input.findings() {
            evidence.add_finding(&model.network, variable, state)?;
        }
        let result = OptimalIntervention::new(&model.network, &evidence)?.evaluate()?;
        debug!(
            expected_utility = result.expected_utility,
            evidence_probability = result.evidence_probability,
            "model evaluated"
        );
        Ok(result.advice())
    }
}
