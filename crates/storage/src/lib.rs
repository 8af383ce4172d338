#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use records::{GAME_RECORDS_KEY, GameRecordRow, decode_game_records, encode_game_records};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};
