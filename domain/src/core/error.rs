//! Domain error types

use crate::core::role::Role;
use thiserror::Error;

/// Domain-level errors
///
/// A failing evaluator surfaces one of these to the orchestrator, which
/// converts it into a fallback verdict. Nothing here escalates past the
/// orchestrator boundary.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("evaluation failed in {role} domain: {reason}")]
    EvaluationFailed { role: Role, reason: String },
}

impl DomainError {
    /// Convenience constructor for an evaluation failure
    pub fn evaluation(role: Role, reason: impl Into<String>) -> Self {
        DomainError::EvaluationFailed {
            role,
            reason: reason.into(),
        }
    }
}
