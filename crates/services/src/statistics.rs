use std::fmt;
use std::sync::Arc;

use quiz_core::model::GameRecord;
use storage::repository::{InMemoryKeyValueStore, KeyValueStore};
use storage::{GAME_RECORDS_KEY, decode_game_records, encode_game_records};

use crate::Clock;

/// Durable log of finished rounds with aggregate queries.
///
/// Persistence is best effort: read and write failures never reach the caller. A failed
/// load starts from an empty log, a failed write keeps the in-memory log ahead of the
/// store. Each failure is logged and kept in [`StatisticService::last_warning`].
pub struct StatisticService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    records: Vec<GameRecord>,
    last_warning: Option<String>,
}

impl StatisticService {
    /// Open the log persisted in `store`.
    pub async fn load(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let mut service = Self {
            clock,
            store,
            records: Vec::new(),
            last_warning: None,
        };

        let loaded = service.store.get(GAME_RECORDS_KEY).await;
        match loaded {
            Ok(Some(bytes)) => match decode_game_records(&bytes) {
                Ok(records) => {
                    tracing::debug!(games = records.len(), "loaded game records");
                    service.records = records;
                }
                Err(err) => service.warn("decode", &err),
            },
            Ok(None) => tracing::debug!("no game records persisted yet"),
            Err(err) => service.warn("load", &err),
        }

        service
    }

    /// Statistics backed by a fresh in-memory store.
    pub async fn in_memory(clock: Clock) -> Self {
        Self::load(Arc::new(InMemoryKeyValueStore::new()), clock).await
    }

    /// Record a finished round stamped with the current time, then persist the log.
    ///
    /// Counts that do not form a valid round are dropped with a warning.
    pub async fn store(&mut self, correct: u32, total: u32) {
        match GameRecord::new(correct, total, self.clock.now()) {
            Ok(record) => self.record(record).await,
            Err(err) => {
                tracing::warn!(correct, total, error = %err, "rejected game record");
                self.last_warning = Some(err.to_string());
            }
        }
    }

    /// Append an already-built record, then persist the whole log.
    pub async fn record(&mut self, record: GameRecord) {
        self.records.push(record);
        tracing::info!(
            correct = record.correct(),
            total = record.total(),
            games = self.records.len(),
            "stored game record"
        );

        let bytes = match encode_game_records(&self.records) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.warn("encode", &err);
                return;
            }
        };
        if let Err(err) = self.store.set(GAME_RECORDS_KEY, bytes).await {
            self.warn("save", &err);
        }
    }

    /// Pooled accuracy: correct answers over questions asked, across every round.
    ///
    /// Returns `0.0` when no round has been recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_accuracy(&self) -> f64 {
        let (correct, total) = self
            .records
            .iter()
            .fold((0_u64, 0_u64), |(correct, total), record| {
                (
                    correct + u64::from(record.correct()),
                    total + u64::from(record.total()),
                )
            });
        if total == 0 {
            return 0.0;
        }
        correct as f64 / total as f64
    }

    #[must_use]
    pub fn games_count(&self) -> usize {
        self.records.len()
    }

    /// Highest-ranked round, see [`GameRecord::cmp_rank`].
    ///
    /// Among rounds with the same score the earliest wins; exact duplicates resolve to the
    /// first one recorded.
    #[must_use]
    pub fn best_game(&self) -> Option<GameRecord> {
        self.records
            .iter()
            .copied()
            .reduce(|best, record| if record.outranks(&best) { record } else { best })
    }

    /// Every recorded round, oldest first.
    #[must_use]
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Most recent persistence problem, if any.
    #[must_use]
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    fn warn(&mut self, stage: &'static str, err: &dyn fmt::Display) {
        tracing::warn!(stage, error = %err, "game record persistence failed");
        self.last_warning = Some(format!("{stage}: {err}"));
    }
}

impl fmt::Debug for StatisticService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticService")
            .field("clock", &self.clock)
            .field("games", &self.records.len())
            .field("last_warning", &self.last_warning)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::StorageError;

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Connection("disk unplugged".into()))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk unplugged".into()))
        }
    }

    fn record_at(correct: u32, minutes: i64) -> GameRecord {
        GameRecord::new(correct, 10, fixed_now() + Duration::minutes(minutes)).unwrap()
    }

    #[tokio::test]
    async fn empty_log_has_no_best_game_and_zero_accuracy() {
        let stats = StatisticService::in_memory(fixed_clock()).await;
        assert_eq!(stats.games_count(), 0);
        assert_eq!(stats.best_game(), None);
        assert!(stats.total_accuracy().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn accuracy_is_pooled_not_averaged() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        stats.store(1, 2).await;
        stats.store(9, 10).await;

        // Pooled: 10 / 12. Averaging per-round ratios would give 0.7.
        assert!((stats.total_accuracy() - 10.0 / 12.0).abs() < 1e-12);
        assert_eq!(stats.games_count(), 2);
    }

    #[tokio::test]
    async fn store_stamps_records_with_the_clock() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        stats.store(6, 10).await;

        let record = stats.records()[0];
        assert_eq!(record.date(), fixed_now());
        assert_eq!((record.correct(), record.total()), (6, 10));
    }

    #[tokio::test]
    async fn best_game_keeps_the_first_round_to_reach_the_top_score() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        for (minutes, correct) in [3, 7, 7, 5].into_iter().enumerate() {
            stats.record(record_at(correct, minutes as i64)).await;
        }

        let best = stats.best_game().expect("best game");
        assert_eq!(best.correct(), 7);
        assert_eq!(best, stats.records()[1]);
    }

    #[tokio::test]
    async fn best_game_prefers_earlier_date_even_if_recorded_later() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        stats.record(record_at(8, 10)).await;
        stats.record(record_at(8, 0)).await;

        assert_eq!(stats.best_game(), Some(record_at(8, 0)));
    }

    #[tokio::test]
    async fn best_game_ignores_total() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        stats.record(GameRecord::new(5, 5, fixed_now()).unwrap()).await;
        stats.record(GameRecord::new(6, 20, fixed_now()).unwrap()).await;

        assert_eq!(stats.best_game().map(|r| r.correct()), Some(6));
    }

    #[tokio::test]
    async fn invalid_counts_are_not_recorded() {
        let mut stats = StatisticService::in_memory(fixed_clock()).await;
        stats.store(3, 0).await;
        stats.store(11, 10).await;

        assert_eq!(stats.games_count(), 0);
        assert!(stats.last_warning().is_some());
    }

    #[tokio::test]
    async fn corrupt_blob_loads_as_empty_log() {
        let kv = InMemoryKeyValueStore::new();
        kv.set(GAME_RECORDS_KEY, b"{ definitely not a log".to_vec())
            .await
            .unwrap();

        let stats = StatisticService::load(Arc::new(kv), fixed_clock()).await;
        assert_eq!(stats.games_count(), 0);
        assert!(stats.last_warning().unwrap().starts_with("decode"));
    }

    #[tokio::test]
    async fn one_invalid_row_discards_the_log_and_next_store_replaces_it() {
        let kv = InMemoryKeyValueStore::new();
        let blob = br#"[{"correct":9,"total":10,"date":"2023-11-14T22:13:20Z"},
                        {"correct":4,"total":0,"date":"2023-11-14T22:13:20Z"}]"#;
        kv.set(GAME_RECORDS_KEY, blob.to_vec()).await.unwrap();

        let mut stats = StatisticService::load(Arc::new(kv.clone()), fixed_clock()).await;
        assert_eq!(stats.games_count(), 0);
        assert!(stats.last_warning().unwrap().starts_with("decode"));

        stats.store(5, 10).await;
        let bytes = kv.get(GAME_RECORDS_KEY).await.unwrap().unwrap();
        let persisted = decode_game_records(&bytes).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].correct(), 5);
    }

    #[tokio::test]
    async fn failing_store_never_surfaces_errors() {
        let mut stats = StatisticService::load(Arc::new(FailingStore), fixed_clock()).await;
        assert_eq!(stats.games_count(), 0);
        assert!(stats.last_warning().unwrap().starts_with("load"));

        stats.store(4, 10).await;

        assert_eq!(stats.games_count(), 1);
        assert!((stats.total_accuracy() - 0.4).abs() < 1e-12);
        assert!(stats.last_warning().unwrap().starts_with("save"));
    }

    #[tokio::test]
    async fn every_store_rewrites_the_whole_log() {
        let kv = InMemoryKeyValueStore::new();
        let mut stats = StatisticService::load(Arc::new(kv.clone()), fixed_clock()).await;
        stats.store(2, 10).await;
        stats.store(8, 10).await;

        let bytes = kv.get(GAME_RECORDS_KEY).await.unwrap().unwrap();
        assert_eq!(decode_game_records(&bytes).unwrap(), stats.records());
    }
}
