mod game_record;
mod question;
mod settings;

pub use game_record::{GameRecord, GameRecordError};
pub use question::{Question, QuestionImage};
pub use settings::{
    DEFAULT_FEEDBACK_DELAY, DEFAULT_QUESTIONS_AMOUNT, RoundSettings, RoundSettingsError,
};
