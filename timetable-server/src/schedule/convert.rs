//! Conversion from stationboard DTOs to domain departures.

use tracing::warn;

use crate::domain::{Departure, DepartureTime};

use super::types::{Connection, StationboardResponse};

/// Convert a stationboard into departures, in provider order.
///
/// Connections whose time cannot be read are skipped rather than failing
/// the whole board.
pub fn convert_stationboard(board: &StationboardResponse) -> Vec<Departure> {
    board
        .connections
        .iter()
        .filter_map(|c| match convert_connection(c) {
            Ok(d) => Some(d),
            Err(raw) => {
                warn!(time = %raw, line = %c.line, "skipping connection with unreadable time");
                None
            }
        })
        .collect()
}

/// Convert a single connection. On failure returns the offending time text.
pub fn convert_connection(connection: &Connection) -> Result<Departure, String> {
    let time = extract_hhmm(&connection.time)
        .ok_or_else(|| connection.time.clone())?;

    Ok(Departure {
        time,
        bus_number: connection.line.clone(),
        destination: connection.terminal.name.clone(),
    })
}

/// Pull "HH:MM" out of "YYYY-MM-DD HH:MM[:SS]" (or a bare "HH:MM[:SS]").
fn extract_hhmm(raw: &str) -> Option<DepartureTime> {
    let time_part = raw.split(' ').nth(1).unwrap_or(raw);
    let hhmm = time_part.get(..5)?;
    DepartureTime::parse_hhmm(hhmm).ok()
}
