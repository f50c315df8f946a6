use thiserror::Error;

use super::{CategoryId, Phase};

/// Malformed quiz content. Fatal at startup.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("category catalog is empty")]
    EmptyCatalog,

    #[error("category '{0}' is declared more than once")]
    DuplicateCategory(CategoryId),

    #[error("question list is empty")]
    NoQuestions,

    #[error("question {question} has no answers")]
    NoAnswers { question: u32 },

    #[error("answer {answer} of question {question} gives points to '{category}', which is not in the catalog")]
    UnknownCategory {
        question: u32,
        answer: usize,
        category: CategoryId,
    },

    #[error("no thinking phrases configured")]
    NoThinkingPhrases,
}

/// The presentation layer drove the session in a way it must not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while the session is {phase}")]
    OutOfSequence { action: &'static str, phase: Phase },

    #[error("answer {index} is out of range, the question has {available} answers")]
    AnswerOutOfRange { index: usize, available: usize },

    #[error("no question at position {progress}, content has {total}")]
    QuestionMissing { progress: usize, total: usize },

    #[error("cannot resolve a winner without categories")]
    NoCategories,
}
