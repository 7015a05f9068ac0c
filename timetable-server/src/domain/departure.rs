//! Scheduled departures.

use serde::{Deserialize, Serialize};

use super::DepartureTime;

/// One scheduled departure from a stop.
///
/// Departures have no identity beyond their contents; two equal rows on the
/// same board are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Scheduled time at the stop
    pub time: DepartureTime,

    /// Line number as displayed (e.g. "12", "N5")
    pub bus_number: String,

    /// Terminus of the trip
    pub destination: String,
}

impl Departure {
    pub fn new(
        time: DepartureTime,
        bus_number: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            time,
            bus_number: bus_number.into(),
            destination: destination.into(),
        }
    }
}
