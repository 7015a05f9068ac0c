//! Bus filters and the time floor.

use crate::domain::{
    BoardError, BusFilter, DepartureTime, FilterId, FilterPatch, Page, TimeError,
    parse_time_floor,
};

/// Active filters for a session.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<BusFilter>,
    time_floor: Option<DepartureTime>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: BusFilter) {
        self.filters.push(filter);
    }

    pub fn remove(&mut self, id: &FilterId) -> Result<BusFilter, BoardError> {
        let pos = self
            .position(id)
            .ok_or_else(|| BoardError::filter_not_found(id))?;
        Ok(self.filters.remove(pos))
    }

    pub fn update(&mut self, id: &FilterId, patch: FilterPatch) -> Result<&BusFilter, BoardError> {
        let pos = self
            .position(id)
            .ok_or_else(|| BoardError::filter_not_found(id))?;
        let filter = &mut self.filters[pos];
        filter.apply(patch);
        Ok(filter)
    }

    /// Set the time floor from user input. Blank input clears it.
    ///
    /// On a parse error the previous floor is kept.
    pub fn set_time_floor(&mut self, value: &str) -> Result<(), TimeError> {
        self.time_floor = parse_time_floor(value)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.filters.clear();
        self.time_floor = None;
    }

    pub fn filters(&self) -> &[BusFilter] {
        &self.filters
    }

    pub fn time_floor(&self) -> Option<DepartureTime> {
        self.time_floor
    }

    pub fn get(&self, id: &FilterId) -> Option<&BusFilter> {
        self.filters.iter().find(|f| &f.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.time_floor.is_none()
    }

    fn position(&self, id: &FilterId) -> Option<usize> {
        self.filters.iter().position(|f| &f.id == id)
    }
}

/// Destinations served by a line across the given pages, in first-seen order.
///
/// Feeds the direction picker of a filter.
pub fn directions_for<'a>(number: &str, pages: impl IntoIterator<Item = &'a Page>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for page in pages {
        for d in &page.raw_departures {
            if d.bus_number == number && !seen.contains(&d.destination) {
                seen.push(d.destination.clone());
            }
        }
    }
    seen
}
