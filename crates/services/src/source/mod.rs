//! Contract between the quiz and whatever supplies its questions.
//!
//! Sources are fire-and-forget: each request hands over a [`SourceReply`], a one-shot
//! callback the source completes whenever its result is ready, from any thread. The
//! reply carries the [`Ticket`] of the request so the receiver can drop results that
//! arrive after it has moved on.

mod catalog;

use std::fmt;

use quiz_core::model::Question;

use crate::error::SourceError;

pub use catalog::{CatalogQuestionSource, Movie};

/// Identifier stamped on an outgoing request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The ticket issued after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed request, as delivered back to the requester.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Question {
        ticket: Ticket,
        question: Option<Question>,
    },
    DataLoaded {
        ticket: Ticket,
    },
    DataLoadFailed {
        ticket: Ticket,
        error: SourceError,
    },
}

impl SourceEvent {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        match self {
            SourceEvent::Question { ticket, .. }
            | SourceEvent::DataLoaded { ticket }
            | SourceEvent::DataLoadFailed { ticket, .. } => *ticket,
        }
    }
}

/// One-shot completion handle for a source request.
pub struct SourceReply {
    ticket: Ticket,
    deliver: Box<dyn FnOnce(SourceEvent) + Send>,
}

impl SourceReply {
    #[must_use]
    pub fn new(ticket: Ticket, deliver: impl FnOnce(SourceEvent) + Send + 'static) -> Self {
        Self {
            ticket,
            deliver: Box::new(deliver),
        }
    }

    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Deliver the next question, or `None` when the source has nothing to offer.
    pub fn question(self, question: Option<Question>) {
        let ticket = self.ticket;
        (self.deliver)(SourceEvent::Question { ticket, question });
    }

    pub fn data_loaded(self) {
        let ticket = self.ticket;
        (self.deliver)(SourceEvent::DataLoaded { ticket });
    }

    pub fn data_load_failed(self, error: SourceError) {
        let ticket = self.ticket;
        (self.deliver)(SourceEvent::DataLoadFailed { ticket, error });
    }
}

impl fmt::Debug for SourceReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceReply")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Supplies questions to a quiz.
pub trait QuestionSource: Send + Sync {
    /// Ask for the next question; the answer arrives through `reply`.
    fn request_next_question(&self, reply: SourceReply);

    /// Prepare whatever backs the questions. Sources with nothing to load succeed at once.
    fn load_data(&self, reply: SourceReply) {
        reply.data_loaded();
    }
}
