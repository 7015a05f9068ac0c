//! Departure times as shown on a timetable board.
//!
//! Providers hand us times as "HH:MM" strings. Boards only ever compare
//! them against each other and against the time floor, so unlike a full
//! timestamp there is no date attached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A zero-padded 24h "HH:MM" time of day.
///
/// Ordering is by hour then minute, which is the same as comparing the
/// "HH:MM" text lexically.
///
/// # Examples
///
/// ```
/// use timetable_server::domain::DepartureTime;
///
/// let t = DepartureTime::parse_hhmm("09:05").unwrap();
/// assert_eq!(t.to_string(), "09:05");
///
/// assert!(DepartureTime::parse_hhmm("9:05").is_err());
/// assert!(DepartureTime::parse_hhmm("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureTime {
    hour: u8,
    minute: u8,
}

impl DepartureTime {
    /// Build a time from its components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self { hour, minute })
    }

    /// Parse a time from "HH:MM" format.
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::new(hour, minute)
    }
}

impl FromStr for DepartureTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepartureTime({:02}:{:02})", self.hour, self.minute)
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u8.
fn parse_two_digits(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some((d1 * 10 + d2) as u8)
}

/// Parse the time floor as entered by the user.
///
/// Blank input means "no floor".
pub fn parse_time_floor(s: &str) -> Result<Option<DepartureTime>, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    DepartureTime::parse_hhmm(s).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert!(DepartureTime::parse_hhmm("00:00").is_ok());
        assert!(DepartureTime::parse_hhmm("23:59").is_ok());
        assert!(DepartureTime::parse_hhmm("09:05").is_ok());
    }

    #[test]
    fn reject_malformed() {
        assert!(DepartureTime::parse_hhmm("").is_err());
        assert!(DepartureTime::parse_hhmm("0905").is_err());
        assert!(DepartureTime::parse_hhmm("9:05").is_err());
        assert!(DepartureTime::parse_hhmm("09-05").is_err());
        assert!(DepartureTime::parse_hhmm("ab:cd").is_err());
        assert!(DepartureTime::parse_hhmm("24:00").is_err());
        assert!(DepartureTime::parse_hhmm("12:60").is_err());
    }

    #[test]
    fn ordering_matches_text() {
        let early = DepartureTime::parse_hhmm("08:59").unwrap();
        let late = DepartureTime::parse_hhmm("09:00").unwrap();
        assert!(early < late);
        assert!("08:59" < "09:00");
    }

    #[test]
    fn display_zero_pads() {
        let t = DepartureTime::new(7, 3).unwrap();
        assert_eq!(t.to_string(), "07:03");
        assert_eq!(format!("{:?}", t), "DepartureTime(07:03)");
    }

    #[test]
    fn time_floor_blank_is_none() {
        assert_eq!(parse_time_floor("").unwrap(), None);
        assert_eq!(parse_time_floor("   ").unwrap(), None);
        assert_eq!(
            parse_time_floor("10:00").unwrap(),
            Some(DepartureTime::new(10, 0).unwrap())
        );
        assert!(parse_time_floor("10h").is_err());
    }

    #[test]
    fn serde_as_string() {
        let t = DepartureTime::new(10, 15).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"10:15\"");
        let back: DepartureTime = serde_json::from_str("\"10:15\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<DepartureTime>("\"1015\"").is_err());
    }
}
