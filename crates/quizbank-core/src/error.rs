//! Typed errors for the quiz engine.
//!
//! The public session operations never surface these directly; they fold
//! them into neutral values. Callers that want to know *why* an operation
//! was ignored use the `try_*` variants.

use thiserror::Error;

/// Reasons an answer submission was not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    /// `start` has not been called yet.
    #[error("no active session")]
    NoActiveSession,

    /// The session was already finished.
    #[error("session is finished")]
    SessionFinished,

    /// The session holds no questions.
    #[error("session has no current question")]
    NoCurrentQuestion,

    /// A single id was given for a multi-select question, or vice versa.
    #[error("question {question_id} expects a {} selection", selection_kind(.expected_multi))]
    ModeMismatch {
        question_id: String,
        expected_multi: bool,
    },

    /// A multi-select answer with no ids in it.
    #[error("selection is empty")]
    EmptySelection,

    /// The selection names an option the question does not have.
    #[error("question {question_id} has no option {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },
}

fn selection_kind(multi: &bool) -> &'static str {
    if *multi {
        "multiple"
    } else {
        "single"
    }
}

/// Errors building a [`QuizConfig`](crate::model::QuizConfig) or one of its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("number of questions must be at least 1")]
    ZeroQuestions,

    #[error("unknown feedback mode: {0} (expected \"immediate\" or \"end\")")]
    UnknownFeedbackMode(String),

    #[error("invalid block: {0} (expected \"all\" or a block number)")]
    InvalidBlock(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_mismatch_message() {
        let err = AnswerError::ModeMismatch {
            question_id: "3".into(),
            expected_multi: true,
        };
        assert_eq!(err.to_string(), "question 3 expects a multiple selection");
    }

    #[test]
    fn config_error_messages() {
        assert!(ConfigError::InvalidBlock("x".into())
            .to_string()
            .contains("\"all\""));
        assert_eq!(
            ConfigError::ZeroQuestions.to_string(),
            "number of questions must be at least 1"
        );
    }
}
