//! Timetable API HTTP client.
//!
//! Async access to the stop-completion and stationboard endpoints, with a
//! semaphore bounding concurrent requests.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Departure, DepartureTime};

use super::ScheduleSource;
use super::convert::convert_stationboard;
use super::error::ScheduleError;
use super::types::{StationboardResponse, StopSuggestion};

/// Default base URL for the timetable API.
pub const DEFAULT_BASE_URL: &str = "https://search.ch/timetable/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Connections requested per stationboard.
const STATIONBOARD_LIMIT: u32 = 50;

/// Shortest search term sent to the completion endpoint.
pub const MIN_SEARCH_LEN: usize = 2;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ScheduleConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Timetable API client.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ScheduleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        if config.max_concurrent == 0 {
            return Err(ScheduleError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search stops by name.
    ///
    /// Terms shorter than two characters return nothing without a request.
    pub async fn search_stops(&self, term: &str) -> Result<Vec<StopSuggestion>, ScheduleError> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/completion.json", self.base_url);
        let query = [
            ("term", term.to_string()),
            ("show_ids", "1".to_string()),
            ("show_coordinates", "1".to_string()),
        ];

        let body = self.get_text(&url, &query).await?;

        // The endpoint answers `null` when nothing matches
        if body.trim() == "null" {
            return Ok(Vec::new());
        }

        serde_json::from_str(&body).map_err(|e| ScheduleError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Fetch the departures board for a stop.
    ///
    /// # Arguments
    ///
    /// * `stop_id` - Provider stop id (a stop name also works)
    /// * `time_floor` - Start the board at this time instead of now
    pub async fn stationboard(
        &self,
        stop_id: &str,
        time_floor: Option<DepartureTime>,
    ) -> Result<Vec<Departure>, ScheduleError> {
        if stop_id.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/stationboard.json", self.base_url);
        let mut query = vec![
            ("stop", stop_id.to_string()),
            ("limit", STATIONBOARD_LIMIT.to_string()),
            ("show_tracks", "1".to_string()),
            ("show_subsequent_stops", "1".to_string()),
        ];
        if let Some(t) = time_floor {
            query.push(("time", t.to_string()));
        }

        let body = self.get_text(&url, &query).await?;

        let board: StationboardResponse =
            serde_json::from_str(&body).map_err(|e| ScheduleError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let departures = convert_stationboard(&board);
        debug!(stop = stop_id, count = departures.len(), "fetched stationboard");
        Ok(departures)
    }

    /// GET a URL and return the body, mapping error statuses.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, ScheduleError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ScheduleError::NotConfigured("semaphore closed".to_string()))?;

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScheduleError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl ScheduleSource for ScheduleClient {
    async fn search_stops(&self, term: &str) -> Result<Vec<StopSuggestion>, ScheduleError> {
        ScheduleClient::search_stops(self, term).await
    }

    async fn fetch(
        &self,
        stop_id: &str,
        time_floor: Option<DepartureTime>,
    ) -> Result<Vec<Departure>, ScheduleError> {
        self.stationboard(stop_id, time_floor).await
    }
}
