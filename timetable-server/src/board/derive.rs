//! Visible-row derivation.
//!
//! For each page the rows shown are computed from its raw departures and
//! the session's filters:
//!
//! 1. keep the first [`DISPLAY_CAP`] rows in provider order,
//! 2. if any bus filter is active, keep rows admitted by at least one filter,
//! 3. if a time floor is set, keep rows at or after it.
//!
//! The cap is applied before filtering. A page whose only matching rows sit
//! past the cap therefore shows nothing; that is the expected behaviour.

use crate::domain::{BusFilter, Departure, DepartureTime};

/// Maximum number of rows a board displays.
pub const DISPLAY_CAP: usize = 11;

/// Compute the visible rows for one page.
pub fn derive_rows(
    raw: &[Departure],
    filters: &[BusFilter],
    floor: Option<DepartureTime>,
) -> Vec<Departure> {
    raw.iter()
        .take(DISPLAY_CAP)
        .filter(|d| filters.is_empty() || filters.iter().any(|f| f.matches(d)))
        .filter(|d| floor.is_none_or(|floor| d.time >= floor))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterId;

    fn t(s: &str) -> DepartureTime {
        DepartureTime::parse_hhmm(s).unwrap()
    }

    fn dep(time: &str, number: &str, dest: &str) -> Departure {
        Departure::new(t(time), number, dest)
    }

    fn filter(number: &str, direction: Option<&str>) -> BusFilter {
        BusFilter {
            id: FilterId::new(format!("f-{number}")),
            number: number.to_string(),
            direction: direction.map(str::to_string),
        }
    }

    fn three() -> Vec<Departure> {
        vec![
            dep("09:00", "12", "A"),
            dep("09:05", "7", "B"),
            dep("09:10", "12", "C"),
        ]
    }

    #[test]
    fn no_filters_is_prefix() {
        let raw: Vec<_> = (0..20)
            .map(|i| dep(&format!("10:{i:02}"), "1", "X"))
            .collect();
        let rows = derive_rows(&raw, &[], None);
        assert_eq!(rows, raw[..DISPLAY_CAP].to_vec());
    }

    #[test]
    fn direction_excludes_same_line_other_destination() {
        let rows = derive_rows(&three(), &[filter("12", Some("A"))], None);
        assert_eq!(rows, vec![dep("09:00", "12", "A")]);
    }

    #[test]
    fn filters_are_or_combined() {
        let rows = derive_rows(&three(), &[filter("12", None), filter("7", None)], None);
        assert_eq!(rows, three());
    }

    #[test]
    fn time_floor_is_inclusive() {
        let raw = vec![
            dep("08:59", "1", "X"),
            dep("09:00", "1", "X"),
            dep("09:01", "1", "X"),
        ];
        let rows = derive_rows(&raw, &[], Some(t("09:00")));
        let times: Vec<String> = rows.iter().map(|d| d.time.to_string()).collect();
        assert_eq!(times, vec!["09:00", "09:01"]);
    }

    #[test]
    fn cap_applies_before_filters() {
        let mut raw: Vec<_> = (0..11)
            .map(|i| dep(&format!("10:{i:02}"), "1", "X"))
            .collect();
        raw.push(dep("10:30", "99", "Y"));

        let rows = derive_rows(&raw, &[filter("99", None)], None);
        assert!(rows.is_empty());
    }

    #[test]
    fn filter_and_floor_combine() {
        let rows = derive_rows(&three(), &[filter("12", None)], Some(t("09:05")));
        assert_eq!(rows, vec![dep("09:10", "12", "C")]);
    }

    #[test]
    fn empty_input() {
        assert!(derive_rows(&[], &[filter("1", None)], Some(t("00:00"))).is_empty());
    }
}
