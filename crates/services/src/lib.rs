#![forbid(unsafe_code)]

pub mod error;
pub mod round;
pub mod source;
pub mod statistics;

pub use quiz_core::Clock;

pub use error::{CatalogError, RoundError, SourceError};
pub use round::{AnswerOutcome, QuizRound, RoundStep};
pub use source::{CatalogQuestionSource, Movie, QuestionSource, SourceEvent, SourceReply, Ticket};
pub use statistics::StatisticService;
