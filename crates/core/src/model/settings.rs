use std::time::Duration;
use thiserror::Error;

/// Number of questions in a round unless configured otherwise.
pub const DEFAULT_QUESTIONS_AMOUNT: u32 = 10;

/// Pause between answering and moving on, while answer feedback is shown.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundSettingsError {
    #[error("questions amount must be greater than zero")]
    NoQuestions,
}

/// Per-round pacing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    questions_amount: u32,
    feedback_delay: Duration,
}

impl RoundSettings {
    /// # Errors
    ///
    /// Returns `RoundSettingsError::NoQuestions` if `questions_amount` is zero.
    pub fn new(
        questions_amount: u32,
        feedback_delay: Duration,
    ) -> Result<Self, RoundSettingsError> {
        if questions_amount == 0 {
            return Err(RoundSettingsError::NoQuestions);
        }
        Ok(Self {
            questions_amount,
            feedback_delay,
        })
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.questions_amount
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            questions_amount: DEFAULT_QUESTIONS_AMOUNT,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}
