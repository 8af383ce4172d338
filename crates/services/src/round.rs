use std::fmt;

use quiz_core::model::{Question, RoundSettings};

use crate::error::RoundError;

/// Result of answering the question on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answers: u32,
}

/// What happens after answer feedback has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    /// Moved on to the question at `index`; it still has to be requested.
    Continue { index: u32 },
    /// The last question was answered.
    Finished { correct: u32, total: u32 },
}

/// Score and position of the round being played.
///
/// Holds at most one question at a time and accepts exactly one answer for it.
pub struct QuizRound {
    questions_amount: u32,
    current_index: u32,
    correct_answers: u32,
    current_question: Option<Question>,
    answered: bool,
    finished: bool,
}

impl QuizRound {
    #[must_use]
    pub fn new(settings: &RoundSettings) -> Self {
        Self {
            questions_amount: settings.questions_amount(),
            current_index: 0,
            correct_answers: 0,
            current_question: None,
            answered: false,
            finished: false,
        }
    }

    /// Back to the first question with no score.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.correct_answers = 0;
        self.current_question = None;
        self.answered = false;
        self.finished = false;
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.questions_amount
    }

    /// Zero-based index of the question being played.
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions_amount
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Put `question` on screen for the current index.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Completed` if the round has already finished.
    pub fn present(&mut self, question: Question) -> Result<&Question, RoundError> {
        if self.finished {
            return Err(RoundError::Completed);
        }
        self.answered = false;
        Ok(self.current_question.insert(question))
    }

    /// Score `given` against the question on screen.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::NoQuestion` if nothing is presented,
    /// `RoundError::AlreadyAnswered` on a second answer to the same question.
    pub fn answer(&mut self, given: bool) -> Result<AnswerOutcome, RoundError> {
        let Some(question) = self.current_question.as_ref() else {
            return Err(RoundError::NoQuestion);
        };
        if self.answered {
            return Err(RoundError::AlreadyAnswered);
        }

        let is_correct = question.is_correct(given);
        self.answered = true;
        if is_correct {
            self.correct_answers += 1;
        }

        Ok(AnswerOutcome {
            is_correct,
            correct_answers: self.correct_answers,
        })
    }

    /// Leave the answered question, either moving to the next index or finishing.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Completed` if the round already finished,
    /// `RoundError::NotAnswered` if the current question is still open.
    pub fn advance(&mut self) -> Result<RoundStep, RoundError> {
        if self.finished {
            return Err(RoundError::Completed);
        }
        if !self.answered {
            return Err(RoundError::NotAnswered);
        }

        self.current_question = None;
        self.answered = false;

        if self.is_last_question() {
            self.finished = true;
            return Ok(RoundStep::Finished {
                correct: self.correct_answers,
                total: self.questions_amount,
            });
        }

        self.current_index += 1;
        Ok(RoundStep::Continue {
            index: self.current_index,
        })
    }
}

impl fmt::Debug for QuizRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRound")
            .field("questions_amount", &self.questions_amount)
            .field("current_index", &self.current_index)
            .field("correct_answers", &self.correct_answers)
            .field("has_question", &self.current_question.is_some())
            .field("answered", &self.answered)
            .field("finished", &self.finished)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
