//! Error types for shape validation, batch assembly, and session lifecycle.

use thiserror::Error;

use crate::engine::StatusCode;

/// Result type for shape validation.
pub type ShapeResult<T> = Result<T, ValidationError>;

/// Result type for batch assembly.
pub type BatchResult<T> = Result<T, BatchError>;

/// Result type for session lifecycle operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Which well-formedness check an initial shape failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `rule_file` is empty.
    EmptyRuleFile,

    /// `start_rule` is empty.
    EmptyStartRule,

    /// `vertices` is empty or its length is not a multiple of 3.
    BadVertexCount,

    /// A `face_counts` entry is zero.
    NonPositiveFaceCount,

    /// `face_counts` does not sum to the number of face indices.
    FaceCountMismatch,

    /// A face index refers past the last vertex.
    IndexOutOfRange,
}

/// An initial shape failed a well-formedness check.
///
/// Checks run in a fixed order and stop at the first violation, so `kind`
/// identifies exactly which check fired.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct ValidationError {
    /// Which check fired.
    pub kind: ValidationErrorKind,

    /// Human-readable description of the violation.
    pub detail: String,
}

/// Validation failures for a whole batch, tagged by shape name.
///
/// Batch assembly validates every shape and collects every failure, so a
/// caller can fix all of them in one round-trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("batch validation failed for {}", render_failures(.failures))]
pub struct BatchValidationError {
    /// Each offending shape name with its validation error, in batch order.
    pub failures: Vec<(String, ValidationError)>,
}

fn render_failures(failures: &[(String, ValidationError)]) -> String {
    let listed = failures
        .iter()
        .map(|(name, err)| format!("'{name}': {err}"))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} shape(s): {listed}", failures.len())
}

/// Errors raised while assembling a generation request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// The batch contains no shapes.
    #[error("cannot build a generation request from an empty batch")]
    EmptyBatch,

    /// A shape name was added more than once; the first duplicate wins.
    #[error("shape '{name}' appears more than once in the batch")]
    DuplicateName {
        /// The duplicated shape name.
        name: String,
    },

    /// One or more shapes failed validation.
    #[error(transparent)]
    Invalid(#[from] BatchValidationError),
}

/// Local precondition and engine-availability errors raised by the session.
///
/// Precondition variants never reach the engine; the caller recovers by
/// correcting call order. [`EngineUnavailable`](SessionError::EngineUnavailable)
/// carries the engine's own status code unchanged.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session is not in the `Ready` state.
    #[error("session is not ready for generation; initialize it first")]
    NotReady,

    /// The session was released and cannot be reused.
    #[error("session has been released and cannot be reused")]
    SessionClosed,

    /// `initialize` was called on a session that is already `Ready`.
    #[error("session is already initialized")]
    AlreadyInitialized,

    /// `release` was called on a session that is already `Released`.
    #[error("session has already been released")]
    AlreadyReleased,

    /// The engine could not be initialized from the given root path and
    /// license feature.
    #[error("engine unavailable (status {status})")]
    EngineUnavailable {
        /// The engine's raw status code, passed through unmodified.
        status: StatusCode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_validation_error_lists_every_failure() {
        let err = BatchValidationError {
            failures: vec![
                (
                    "lot1".to_string(),
                    ValidationError {
                        kind: ValidationErrorKind::EmptyRuleFile,
                        detail: "rule_file must not be empty".to_string(),
                    },
                ),
                (
                    "lot2".to_string(),
                    ValidationError {
                        kind: ValidationErrorKind::FaceCountMismatch,
                        detail: "face_counts sums to 4 but 3 face indices were provided"
                            .to_string(),
                    },
                ),
            ],
        };

        let rendered = err.to_string();
        assert!(rendered.contains("2 shape(s)"));
        assert!(rendered.contains("'lot1': rule_file must not be empty"));
        assert!(rendered.contains("'lot2': face_counts sums to 4"));
    }

    #[test]
    fn test_batch_error_from_batch_validation_error() {
        let inner = BatchValidationError { failures: vec![] };
        let err: BatchError = inner.clone().into();
        assert_eq!(err, BatchError::Invalid(inner));
    }

    #[test]
    fn test_engine_unavailable_carries_status() {
        let err = SessionError::EngineUnavailable { status: 4 };
        assert!(err.to_string().contains("status 4"));
    }
}
