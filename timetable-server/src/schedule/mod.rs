//! Schedule source: stop search and departure boards.
//!
//! The provider is the search.ch timetable API. Its results are converted
//! into domain [`Departure`]s; boards never see provider types.
//!
//! Fetching fails open. When the provider errors or has nothing for a stop,
//! [`fetch_or_demo`] substitutes a demo schedule so the board still shows
//! something, and reports that it did.

mod client;
mod convert;
mod demo;
mod error;
mod types;

use std::future::Future;

use serde::Serialize;
use tracing::warn;

use crate::domain::{Departure, DepartureTime};

pub use client::{DEFAULT_BASE_URL, MIN_SEARCH_LEN, ScheduleClient, ScheduleConfig};
pub use convert::{convert_connection, convert_stationboard};
pub use demo::demo_schedule;
pub use error::ScheduleError;
pub use types::{BoardStop, Connection, StationboardResponse, StopSuggestion, Terminal};

/// Anything that can search stops and produce departures for one.
pub trait ScheduleSource {
    /// Stops whose name matches `term`.
    fn search_stops(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<StopSuggestion>, ScheduleError>> + Send;

    /// Departures from a stop, optionally starting at `time_floor`.
    fn fetch(
        &self,
        stop_id: &str,
        time_floor: Option<DepartureTime>,
    ) -> impl Future<Output = Result<Vec<Departure>, ScheduleError>> + Send;
}

/// Where a set of departures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleOrigin {
    Provider,
    Demo,
}

/// Departures for a stop, with their origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFetch {
    pub departures: Vec<Departure>,
    pub origin: ScheduleOrigin,
}

impl ScheduleFetch {
    pub fn is_demo(&self) -> bool {
        self.origin == ScheduleOrigin::Demo
    }
}

/// Fetch departures for a stop, falling back to demo data.
///
/// `stop_id` is tried first; when it is empty the stop name is sent
/// instead. Provider errors are logged, never returned.
pub async fn fetch_or_demo<S: ScheduleSource>(
    source: &S,
    stop_id: &str,
    stop_name: &str,
    time_floor: Option<DepartureTime>,
) -> ScheduleFetch {
    let key = if stop_id.is_empty() { stop_name } else { stop_id };

    match source.fetch(key, time_floor).await {
        Ok(departures) if !departures.is_empty() => ScheduleFetch {
            departures,
            origin: ScheduleOrigin::Provider,
        },
        Ok(_) => {
            warn!(stop = key, "no departures from provider, using demo schedule");
            demo(stop_name)
        }
        Err(e) => {
            warn!(stop = key, error = %e, "schedule fetch failed, using demo schedule");
            demo(stop_name)
        }
    }
}

fn demo(stop_name: &str) -> ScheduleFetch {
    ScheduleFetch {
        departures: demo_schedule(stop_name),
        origin: ScheduleOrigin::Demo,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockSource;
    use super::*;

    fn row(time: &str, line: &str) -> Departure {
        Departure::new(DepartureTime::parse_hhmm(time).unwrap(), line, "Somewhere")
    }

    #[tokio::test]
    async fn provider_rows_used_when_present() {
        let source = MockSource::default().with_board("8587061", vec![row("06:42", "10")]);

        let fetched = fetch_or_demo(&source, "8587061", "Genève, Bouchet", None).await;
        assert_eq!(fetched.origin, ScheduleOrigin::Provider);
        assert_eq!(fetched.departures, vec![row("06:42", "10")]);
    }

    #[tokio::test]
    async fn empty_board_falls_back_to_demo() {
        let source = MockSource::default().with_board("8587061", vec![]);

        let fetched = fetch_or_demo(&source, "8587061", "Genève, Bouchet", None).await;
        assert!(fetched.is_demo());
        assert_eq!(fetched.departures, demo_schedule("Genève, Bouchet"));
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_demo() {
        let source = MockSource::default();

        let fetched = fetch_or_demo(&source, "missing", "Somewhere", None).await;
        assert!(fetched.is_demo());
        assert_eq!(fetched.departures.len(), 9);
    }

    #[tokio::test]
    async fn stop_name_used_without_id() {
        let source = MockSource::default().with_board("Genève, Rive", vec![row("08:00", "2")]);
        let floor = DepartureTime::parse_hhmm("07:30").ok();

        let fetched = fetch_or_demo(&source, "", "Genève, Rive", floor).await;
        assert!(!fetched.is_demo());

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("Genève, Rive".to_string(), floor)]);
    }
}
