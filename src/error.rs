//! Service-layer error types.

use thiserror::Error;

use crate::state::session::InvalidTransition;

/// Errors that can occur in service layer operations.
///
/// Submission-path failures never reach this type; they collapse into a
/// `SubmissionOutcome` so one bad upload cannot disturb the round loop.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Operation cannot be performed in the current session phase.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}
