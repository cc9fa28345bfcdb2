// ABOUTME: Error kinds for contract violations and submission failures in the wizard
// Validation problems are not errors here; they are recorded as step errors on the state

use thiserror::Error;

use super::step::LogicalStep;
use crate::api::SubmissionError;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Missing step data for required step: {0}")]
    MissingStepData(LogicalStep),
    #[error("No step view registered for step: {0}")]
    MissingStepView(LogicalStep),
    #[error("Template submission failed: {0}")]
    Submission(#[from] SubmissionError),
}
