use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::{error::AppResult, models::Genre, services::catalog::CatalogProvider};

/// Freshness window for the cached taxonomy.
pub const GENRE_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Time source for cache expiry, injected so tests can control it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheSlot {
    genres: Vec<Genre>,
    fetched_at: Instant,
}

/// Process-wide cache of the external catalog's genre taxonomy.
///
/// One shared instance, lazily populated. Stale entries are replaced
/// wholesale, never merged. The lock guards only the slot swap; the fetch
/// happens outside it, so concurrent callers may race to refresh. The races
/// are benign: every winner writes an equally fresh set.
pub struct GenreCache {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<CacheSlot>>,
}

impl GenreCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, GENRE_CACHE_TTL)
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached taxonomy, refreshing it from `source` on first use
    /// or once it has aged past the freshness window.
    pub async fn get(&self, source: &dyn CatalogProvider) -> AppResult<Vec<Genre>> {
        let now = self.clock.now();

        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref() {
                if now.duration_since(cached.fetched_at) < self.ttl {
                    return Ok(cached.genres.clone());
                }
            }
        }

        let genres = source.fetch_genres().await?;
        tracing::info!(genres = genres.len(), "Refreshed genre taxonomy");

        let mut slot = self.slot.write().await;
        *slot = Some(CacheSlot {
            genres: genres.clone(),
            fetched_at: now,
        });

        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogProvider;
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn starting_now() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn taxonomy(names: &[&str]) -> Vec<Genre> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Genre {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_first_call_populates_cache() {
        let mut source = MockCatalogProvider::new();
        source
            .expect_fetch_genres()
            .times(1)
            .returning(|| Ok(taxonomy(&["Action", "Drama"])));

        let cache = GenreCache::new(Arc::new(ManualClock::starting_now()));
        let genres = cache.get(&source).await.unwrap();

        assert_eq!(genres, taxonomy(&["Action", "Drama"]));
    }

    #[tokio::test]
    async fn test_fresh_cache_is_not_refetched() {
        let mut source = MockCatalogProvider::new();
        source
            .expect_fetch_genres()
            .times(1)
            .returning(|| Ok(taxonomy(&["Action"])));

        let clock = Arc::new(ManualClock::starting_now());
        let cache = GenreCache::new(Arc::clone(&clock) as Arc<dyn Clock>);

        cache.get(&source).await.unwrap();
        clock.advance(Duration::from_secs(60 * 60 * 23));
        let genres = cache.get(&source).await.unwrap();

        assert_eq!(genres, taxonomy(&["Action"]));
    }

    #[tokio::test]
    async fn test_expired_cache_is_replaced_wholesale() {
        let mut source = MockCatalogProvider::new();
        let mut calls = 0;
        source.expect_fetch_genres().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(taxonomy(&["Action", "Drama"]))
            } else {
                Ok(taxonomy(&["Comedy"]))
            }
        });

        let clock = Arc::new(ManualClock::starting_now());
        let cache = GenreCache::new(Arc::clone(&clock) as Arc<dyn Clock>);

        cache.get(&source).await.unwrap();
        clock.advance(GENRE_CACHE_TTL);
        let genres = cache.get(&source).await.unwrap();

        assert_eq!(genres, taxonomy(&["Comedy"]));
    }

    #[tokio::test]
    async fn test_source_failure_keeps_cache_empty() {
        let mut source = MockCatalogProvider::new();
        source.expect_fetch_genres().times(2).returning(|| {
            Err(crate::error::AppError::CatalogFetch {
                status: 503,
                body: "unavailable".to_string(),
            })
        });

        let cache = GenreCache::new(Arc::new(ManualClock::starting_now()));

        assert!(cache.get(&source).await.is_err());
        // Still empty, so the next call fetches again rather than serving
        // a phantom entry.
        assert!(cache.get(&source).await.is_err());
    }
}
