use chrono::{DateTime, Utc};
use quiz_core::model::{GameRecord, GameRecordError};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Key under which the whole game-record log is stored.
pub const GAME_RECORDS_KEY: &str = "gameRecords";

/// Persisted shape for a game record.
///
/// Mirrors the domain `GameRecord` so the log can be serialized without leaking serde into
/// the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecordRow {
    pub correct: u32,
    pub total: u32,
    pub date: DateTime<Utc>,
}

impl GameRecordRow {
    #[must_use]
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            correct: record.correct(),
            total: record.total(),
            date: record.date(),
        }
    }

    /// Convert the row back into a domain `GameRecord`.
    ///
    /// # Errors
    ///
    /// Returns `GameRecordError` if the persisted counts are not a valid round.
    pub fn into_record(self) -> Result<GameRecord, GameRecordError> {
        GameRecord::new(self.correct, self.total, self.date)
    }
}

/// Serialize the whole log as a JSON array, oldest first.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_game_records(records: &[GameRecord]) -> Result<Vec<u8>, StorageError> {
    let rows: Vec<GameRecordRow> = records.iter().map(GameRecordRow::from_record).collect();
    serde_json::to_vec(&rows).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a log written by [`encode_game_records`].
///
/// A single invalid row fails the whole decode.
///
/// # Errors
///
/// Returns `StorageError::Serialization` on malformed JSON or invalid records.
pub fn decode_game_records(bytes: &[u8]) -> Result<Vec<GameRecord>, StorageError> {
    let rows: Vec<GameRecordRow> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    rows.into_iter()
        .map(|row| {
            row.into_record()
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .collect()
}
