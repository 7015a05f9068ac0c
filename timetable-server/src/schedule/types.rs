//! Timetable API response DTOs.
//!
//! These map directly onto the provider's JSON. Fields we never read are
//! left out; everything optional in practice is an `Option`.

use serde::{Deserialize, Serialize};

/// One entry from `completion.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopSuggestion {
    /// Display name, e.g. "Genève, Bouchet".
    pub label: String,

    /// Stop id, present when `show_ids=1` was requested.
    pub id: Option<String>,

    /// Icon class, e.g. "sl-icon-type-bus".
    pub iconclass: Option<String>,

    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Response from `stationboard.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationboardResponse {
    pub stop: Option<BoardStop>,

    /// Missing when the stop has no upcoming connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// The stop a stationboard was generated for.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardStop {
    pub id: String,
    pub name: String,
}

/// A single departure on a stationboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    /// "YYYY-MM-DD HH:MM:SS" in local time.
    pub time: String,

    /// Transport type, e.g. "bus", "tram".
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Line number as displayed.
    pub line: String,

    /// Where the trip ends.
    pub terminal: Terminal,

    /// Platform or track, present with `show_tracks=1`.
    pub track: Option<String>,
}

/// Terminus of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Terminal {
    pub id: Option<String>,
    pub name: String,
}
