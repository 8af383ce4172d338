use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when a finished round cannot be represented as a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameRecordError {
    #[error("a round must contain at least one question")]
    EmptyRound,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

//
// ─── GAME RECORD ──────────────────────────────────────────────────────────────
//

/// Outcome of one completed round.
///
/// Records are immutable once built. Equality compares every field; ranking between
/// records goes through [`GameRecord::cmp_rank`] instead of `Ord`, since two records with
/// the same score and date are tied for ranking without being the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl GameRecord {
    /// Build a record for a finished round.
    ///
    /// # Errors
    ///
    /// Returns `GameRecordError::EmptyRound` if `total` is zero.
    /// Returns `GameRecordError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(correct: u32, total: u32, date: DateTime<Utc>) -> Result<Self, GameRecordError> {
        if total == 0 {
            return Err(GameRecordError::EmptyRound);
        }
        if correct > total {
            return Err(GameRecordError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            date,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Ranking order used to pick the best game.
    ///
    /// A higher `correct` ranks higher. On equal `correct` the earlier record ranks higher,
    /// so a score is held by the first round that reached it. `total` is not considered.
    #[must_use]
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.correct
            .cmp(&other.correct)
            .then_with(|| other.date.cmp(&self.date))
    }

    /// Returns true if `self` strictly outranks `other`.
    #[must_use]
    pub fn outranks(&self, other: &Self) -> bool {
        self.cmp_rank(other) == Ordering::Greater
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn rejects_empty_round() {
        let err = GameRecord::new(0, 0, fixed_now()).unwrap_err();
        assert_eq!(err, GameRecordError::EmptyRound);
    }

    #[test]
    fn rejects_more_correct_than_total() {
        let err = GameRecord::new(11, 10, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            GameRecordError::CorrectExceedsTotal {
                correct: 11,
                total: 10
            }
        ));
    }

    #[test]
    fn higher_score_outranks_regardless_of_total_and_date() {
        let older = GameRecord::new(8, 20, fixed_now()).unwrap();
        let newer = GameRecord::new(7, 7, fixed_now() + Duration::days(1)).unwrap();
        assert!(older.outranks(&newer));
        assert!(!newer.outranks(&older));
    }

    #[test]
    fn earlier_record_wins_a_tie() {
        let first = GameRecord::new(7, 10, fixed_now()).unwrap();
        let second = GameRecord::new(7, 10, fixed_now() + Duration::hours(1)).unwrap();
        assert_eq!(first.cmp_rank(&second), Ordering::Greater);
        assert!(first.outranks(&second));
    }

    #[test]
    fn identical_score_and_date_is_a_rank_tie() {
        let a = GameRecord::new(5, 10, fixed_now()).unwrap();
        let b = GameRecord::new(5, 8, fixed_now()).unwrap();
        assert_eq!(a.cmp_rank(&b), Ordering::Equal);
        assert_ne!(a, b);
    }
}
