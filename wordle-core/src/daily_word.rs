use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use wordle_types::WORD_LENGTH;

use crate::WordValidator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordSourceError {
    #[error("Failed to fetch daily word: {0}")]
    Request(String),
    #[error("Failed to fetch daily word: status {0}")]
    Status(u16),
    #[error("Malformed daily word payload: {0}")]
    Malformed(String),
}

/// External word-of-the-day service.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch_word(&self, date: NaiveDate) -> Result<String, WordSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWord {
    pub word: String,
    pub date: NaiveDate,
}

impl DailyWord {
    /// Date as stored with player stats (`YYYY-MM-DD`).
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Process-wide cache of today's puzzle word.
///
/// The puzzle day is computed in one fixed offset for the whole process so
/// every player shares the same day boundary.
pub struct DailyWordProvider {
    source: Arc<dyn WordSource>,
    offset: FixedOffset,
    cache: Mutex<Option<DailyWord>>,
}

impl DailyWordProvider {
    pub fn new(source: Arc<dyn WordSource>, offset: FixedOffset) -> Self {
        Self {
            source,
            offset,
            cache: Mutex::new(None),
        }
    }

    pub fn utc(source: Arc<dyn WordSource>) -> Self {
        Self::new(source, Utc.fix())
    }

    pub fn puzzle_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Today's word, fetching it first if the cached one is from another day.
    ///
    /// The lock is held across the fetch so a refresh is never observed half
    /// done and concurrent callers wait for the single in-flight fetch. A
    /// failed fetch leaves the cache as it was and is returned to the caller.
    pub async fn current_word(&self, now: DateTime<Utc>) -> Result<DailyWord, WordSourceError> {
        let today = self.puzzle_date(now);
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.date == today {
                return Ok(cached.clone());
            }
        }

        let raw = self.source.fetch_word(today).await?;
        let word = raw.trim().to_lowercase();
        if word.chars().count() != WORD_LENGTH || !WordValidator::is_alphabetic(&word) {
            return Err(WordSourceError::Malformed(format!(
                "expected a {WORD_LENGTH}-letter word, got {raw:?}"
            )));
        }

        let daily = DailyWord { word, date: today };
        info!(date = %daily.date_key(), "Fetched daily word");
        *cache = Some(daily.clone());

        Ok(daily)
    }

    /// The cached word without triggering a refresh.
    pub async fn cached(&self) -> Option<DailyWord> {
        self.cache.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WordSource for CountingSource {
        async fn fetch_word(&self, date: NaiveDate) -> Result<String, WordSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(WordSourceError::Status(503));
            }

            // A different word per day so refreshes are visible.
            let words = ["crane", "slate", "trace"];
            let index = date.format("%d").to_string().parse::<usize>().unwrap_or(0) % words.len();
            Ok(words[index].to_uppercase())
        }
    }

    struct FixedSource(&'static str);

    #[async_trait]
    impl WordSource for FixedSource {
        async fn fetch_word(&self, _date: NaiveDate) -> Result<String, WordSourceError> {
            Ok(self.0.to_string())
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_same_day_uses_cache() {
        let source = CountingSource::new();
        let provider = DailyWordProvider::utc(source.clone());

        let first = provider.current_word(at(2025, 3, 1, 8)).await.unwrap();
        let second = provider.current_word(at(2025, 3, 1, 23)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.date_key(), "2025-03-01");
        assert_eq!(first.word, first.word.to_lowercase());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_day_triggers_one_fetch() {
        let source = CountingSource::new();
        let provider = DailyWordProvider::utc(source.clone());

        let day_one = provider.current_word(at(2025, 3, 1, 12)).await.unwrap();
        let day_two = provider.current_word(at(2025, 3, 2, 0)).await.unwrap();
        provider.current_word(at(2025, 3, 2, 18)).await.unwrap();

        assert_ne!(day_one.date, day_two.date);
        assert_ne!(day_one.word, day_two.word);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_one_fetch() {
        let source = CountingSource::new();
        let provider = Arc::new(DailyWordProvider::utc(source.clone()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let provider = provider.clone();
            handles.push(tokio::spawn(async move {
                provider.current_word(at(2025, 3, 1, 12)).await
            }));
        }

        let mut words = Vec::new();
        for handle in handles {
            words.push(handle.await.unwrap().unwrap());
        }

        assert!(words.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_without_stale_word() {
        let provider = DailyWordProvider::utc(CountingSource::failing());

        let result = provider.current_word(at(2025, 3, 1, 12)).await;
        assert_eq!(result.unwrap_err(), WordSourceError::Status(503));
        assert!(provider.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_word_rejected() {
        for bad in ["", "toolong", "cr4ne"] {
            let provider = DailyWordProvider::utc(Arc::new(FixedSource(bad)));
            let result = provider.current_word(at(2025, 3, 1, 12)).await;
            assert!(matches!(result, Err(WordSourceError::Malformed(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_day_boundary_follows_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let provider = DailyWordProvider::new(Arc::new(FixedSource("crane")), offset);

        // 23:00 UTC is already the next day two hours east
        let date = provider.puzzle_date(at(2025, 3, 1, 23));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }
}
