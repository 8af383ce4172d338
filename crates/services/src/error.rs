//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by `QuizRound` when an event does not fit the round's state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("no question is being presented")]
    NoQuestion,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("round already completed")]
    Completed,
}

/// Failures reported by a question source.
///
/// Cloneable so it can travel inside `SourceEvent`s across the UI context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to load question data: {0}")]
    LoadFailed(String),
    #[error("question source is unavailable")]
    Unavailable,
}

/// Errors raised while reading a movie catalogue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalogue could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalogue is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalogue contains no movies")]
    Empty,
}

impl From<CatalogError> for SourceError {
    fn from(err: CatalogError) -> Self {
        SourceError::LoadFailed(err.to_string())
    }
}
