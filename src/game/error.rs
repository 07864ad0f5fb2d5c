//! Errors raised when a round cannot begin.

use crate::core::QuestionType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("not enough {} items to start a round", .question_type.tag())]
    NotEnoughItems { question_type: QuestionType },
}
