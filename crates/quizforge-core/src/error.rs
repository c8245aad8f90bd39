//! Quiz error types.
//!
//! Every variant is a local validation failure raised while a quiz is being
//! authored, instantiated or checked. None of them are transient, so callers
//! should surface them instead of retrying.

use thiserror::Error;

/// Errors raised by the quiz model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    /// A question could not be constructed.
    #[error("invalid question '{prompt}': {reason}")]
    InvalidQuestion { prompt: String, reason: String },

    /// A term name was added to a vocabulary twice.
    #[error("duplicate term: {0}")]
    DuplicateTerm(String),

    /// The vocabulary is too small for the requested generator.
    #[error("insufficient terms: need {needed}, vocabulary has {available}")]
    InsufficientTerms { needed: usize, available: usize },

    /// Markdown source did not follow the question grammar.
    #[error("malformed quiz at line {line}: {message}")]
    MalformedQuiz { line: usize, message: String },

    /// The number of responses does not match the number of questions.
    #[error("expected {expected} response(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// An interactive response was submitted for a question that does not exist.
    #[error("response position {position} is out of range for {len} question(s)")]
    ResponseOutOfRange { position: usize, len: usize },

    /// A completion code was requested before the quiz was passed.
    #[error("completion code requested before the quiz was passed")]
    NotPassed,

    /// A passing threshold outside `(0, 1]`.
    #[error("invalid threshold {0}: must be greater than 0 and at most 1")]
    InvalidThreshold(f64),

    /// A completion code format that cannot produce codes.
    #[error("invalid completion code format: {0}")]
    InvalidCodeFormat(String),
}

impl QuizError {
    pub(crate) fn invalid_question(prompt: &str, reason: impl Into<String>) -> Self {
        QuizError::InvalidQuestion {
            prompt: prompt.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        QuizError::MalformedQuiz {
            line,
            message: message.into(),
        }
    }

    /// Returns `true` if this error points at the quiz source rather than at
    /// the responses or the session that used it.
    pub fn is_authoring_error(&self) -> bool {
        !matches!(
            self,
            QuizError::ArityMismatch { .. }
                | QuizError::ResponseOutOfRange { .. }
                | QuizError::NotPassed
        )
    }
}

/// Validate a passing threshold expressed as a fraction of the total.
pub(crate) fn check_threshold(threshold: f64) -> Result<f64, QuizError> {
    if threshold.is_finite() && threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(QuizError::InvalidThreshold(threshold))
    }
}
