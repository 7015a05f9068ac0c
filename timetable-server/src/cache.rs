//! Caching layer for timetable API responses.
//!
//! Several boards often show the same stop, and a refresh re-requests every
//! board at once. Stationboards are cached per (stop, time floor) and stop
//! searches per lowercased term, both with a short TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Departure, DepartureTime};
use crate::schedule::{ScheduleClient, ScheduleError, ScheduleSource, StopSuggestion};

/// Cache key for stationboards: (stop id, time floor).
type BoardKey = (String, Option<DepartureTime>);

/// Cached stationboard entry.
type BoardEntry = Arc<Vec<Departure>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per table.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache for timetable API responses.
pub struct ScheduleCache {
    boards: MokaCache<BoardKey, BoardEntry>,
    searches: MokaCache<String, Arc<Vec<StopSuggestion>>>,
}

impl ScheduleCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { boards, searches }
    }

    pub async fn get_board(&self, key: &BoardKey) -> Option<BoardEntry> {
        self.boards.get(key).await
    }

    pub async fn insert_board(&self, key: BoardKey, entry: BoardEntry) {
        self.boards.insert(key, entry).await;
    }

    pub async fn get_search(&self, term: &str) -> Option<Arc<Vec<StopSuggestion>>> {
        self.searches.get(term).await
    }

    pub async fn insert_search(&self, term: String, entry: Arc<Vec<StopSuggestion>>) {
        self.searches.insert(term, entry).await;
    }
}

/// Wraps a schedule source and caches its responses.
///
/// Empty boards are not cached, so a stop the provider had nothing for is
/// asked again on the next request.
pub struct CachedScheduleClient<S = ScheduleClient> {
    client: S,
    cache: ScheduleCache,
}

impl<S: ScheduleSource + Sync> CachedScheduleClient<S> {
    pub fn new(client: S, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: ScheduleCache::new(cache_config),
        }
    }

    /// Departures for a stop, using the cache if available.
    pub async fn departures(
        &self,
        stop_id: &str,
        time_floor: Option<DepartureTime>,
    ) -> Result<BoardEntry, ScheduleError> {
        let key = (stop_id.to_string(), time_floor);

        if let Some(cached) = self.cache.get_board(&key).await {
            return Ok(cached);
        }

        let departures = Arc::new(self.client.fetch(stop_id, time_floor).await?);
        if !departures.is_empty() {
            self.cache.insert_board(key, departures.clone()).await;
        }

        Ok(departures)
    }

    /// Stop suggestions, using the cache if available.
    pub async fn stops(&self, term: &str) -> Result<Arc<Vec<StopSuggestion>>, ScheduleError> {
        let key = term.trim().to_lowercase();

        if let Some(cached) = self.cache.get_search(&key).await {
            return Ok(cached);
        }

        let suggestions = Arc::new(self.client.search_stops(term).await?);
        self.cache.insert_search(key, suggestions.clone()).await;

        Ok(suggestions)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &S {
        &self.client
    }
}

impl<S: ScheduleSource + Sync> ScheduleSource for CachedScheduleClient<S> {
    async fn search_stops(&self, term: &str) -> Result<Vec<StopSuggestion>, ScheduleError> {
        Ok(self.stops(term).await?.as_ref().clone())
    }

    async fn fetch(
        &self,
        stop_id: &str,
        time_floor: Option<DepartureTime>,
    ) -> Result<Vec<Departure>, ScheduleError> {
        Ok(self.departures(stop_id, time_floor).await?.as_ref().clone())
    }
}
