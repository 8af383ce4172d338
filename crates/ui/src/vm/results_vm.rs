use quiz_core::model::GameRecord;
use services::StatisticService;

use crate::context::UiAction;
use crate::vm::time_fmt::{format_percent, format_record_date};

/// Figures shown at the end of a round, before formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundResults {
    pub correct: u32,
    pub total: u32,
    pub games_count: usize,
    pub best_game: Option<GameRecord>,
    pub total_accuracy: f64,
}

impl RoundResults {
    /// Combine the finished round with the statistics it was just stored into.
    #[must_use]
    pub fn collect(correct: u32, total: u32, statistics: &StatisticService) -> Self {
        Self {
            correct,
            total,
            games_count: statistics.games_count(),
            best_game: statistics.best_game(),
            total_accuracy: statistics.total_accuracy(),
        }
    }
}

/// End-of-round summary screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub title: String,
    pub text: String,
    pub button_text: String,
    pub action: UiAction,
}

impl From<&RoundResults> for QuizResultsVm {
    fn from(results: &RoundResults) -> Self {
        let best_game = results.best_game.map_or_else(
            || "no data".to_owned(),
            |best| {
                format!(
                    "{}/{} ({})",
                    best.correct(),
                    best.total(),
                    format_record_date(best.date())
                )
            },
        );

        let text = format!(
            "Your result: {}/{}\nQuizzes played: {}\nRecord: {best_game}\nAverage accuracy: {}",
            results.correct,
            results.total,
            results.games_count,
            format_percent(results.total_accuracy),
        );

        Self {
            title: "This round is over!".to_owned(),
            text,
            button_text: "Play again".to_owned(),
            action: UiAction::PlayAgain,
        }
    }
}
