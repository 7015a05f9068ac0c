//! Board session: the state owner for one open project.
//!
//! A session holds the pages being edited, the active filters, which page
//! is selected, and the rows derived for each page. Every mutation goes
//! through a method here, and every method that can change what a page
//! shows re-derives the affected rows before returning, so
//! [`BoardSession::derived_rows`] is always current.

mod derive;
mod filters;
mod pages;

#[cfg(test)]
mod session_tests;

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{
    BoardError, BusFilter, Departure, DepartureTime, FilterId, FilterPatch, Page, PageId,
    PageInit, PagePatch, TimeError,
};
use crate::quota::Plan;

pub use derive::{DISPLAY_CAP, derive_rows};
pub use filters::{FilterSet, directions_for};
pub use pages::PageSet;

/// Pages, filters, selection and derived rows for one project.
#[derive(Debug, Clone, Default)]
pub struct BoardSession {
    pages: PageSet,
    filters: FilterSet,
    derived: HashMap<PageId, Vec<Departure>>,
    selected: Option<PageId>,
    next_page: u64,
    next_filter: u64,
}

impl BoardSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session holding previously persisted pages.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let mut session = Self::new();
        session.replace_all_pages(pages);
        session
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Append a page and select it.
    ///
    /// Without an explicit id in `init` a temporary `temp-N` id is minted.
    pub fn add_page(&mut self, init: Option<PageInit>) -> Result<PageId, BoardError> {
        let mut init = init.unwrap_or_default();
        let id = match init.id.take() {
            Some(id) => id,
            None => self.mint_page_id(),
        };

        let page = Page::from_init(id.clone(), init);
        self.pages.push(page)?;
        self.selected = Some(id.clone());
        debug!(page = %id, "added page");

        self.recompute_all();
        Ok(id)
    }

    /// Remove a page and its derived rows. Clears the selection if it
    /// pointed at this page.
    pub fn remove_page(&mut self, id: &PageId) -> Result<Page, BoardError> {
        let page = self.pages.remove(id)?;
        self.derived.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        debug!(page = %id, "removed page");

        self.recompute_all();
        Ok(page)
    }

    /// Merge a patch into a page.
    ///
    /// New departures in the patch are derived for this page straight away.
    pub fn update_page(&mut self, id: &PageId, patch: PagePatch) -> Result<(), BoardError> {
        let new_rows = patch.raw_departures.is_some();
        self.pages.update(id, patch)?;

        if new_rows {
            self.derive_page(id);
        }

        self.recompute_all();
        Ok(())
    }

    /// Replace every page, e.g. after loading a project.
    ///
    /// Derived rows are rebuilt for exactly the new pages. The selection
    /// survives only if its page is still present.
    pub fn replace_all_pages(&mut self, pages: Vec<Page>) {
        self.pages.replace_all(pages);
        self.derived.clear();
        if self
            .selected
            .as_ref()
            .is_some_and(|sel| !self.pages.contains(sel))
        {
            self.selected = None;
        }
        debug!(count = self.pages.len(), "replaced pages");

        self.recompute_all();
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Add a bus filter. The number is taken as given.
    pub fn add_filter(&mut self, number: impl Into<String>, direction: Option<String>) -> FilterId {
        self.next_filter += 1;
        let id = FilterId::new(format!("filter-{}", self.next_filter));
        self.filters.push(BusFilter {
            id: id.clone(),
            number: number.into(),
            direction: direction.filter(|d| !d.is_empty()),
        });
        debug!(filter = %id, "added filter");

        self.recompute_all();
        id
    }

    pub fn remove_filter(&mut self, id: &FilterId) -> Result<BusFilter, BoardError> {
        let removed = self.filters.remove(id)?;
        self.recompute_all();
        Ok(removed)
    }

    pub fn update_filter(&mut self, id: &FilterId, patch: FilterPatch) -> Result<(), BoardError> {
        self.filters.update(id, patch)?;
        self.recompute_all();
        Ok(())
    }

    /// Set the time floor. Blank clears it.
    pub fn set_time_filter(&mut self, value: &str) -> Result<(), TimeError> {
        self.filters.set_time_floor(value)?;
        self.recompute_all();
        Ok(())
    }

    /// Drop all bus filters and the time floor.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute_all();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a page, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&PageId>) -> Result<(), BoardError> {
        match id {
            Some(id) if !self.pages.contains(id) => Err(BoardError::page_not_found(id)),
            Some(id) => {
                self.selected = Some(id.clone());
                Ok(())
            }
            None => {
                self.selected = None;
                Ok(())
            }
        }
    }

    pub fn selected(&self) -> Option<&PageId> {
        self.selected.as_ref()
    }

    /// The page a stop search should update: the selected page, else the
    /// most recently added one.
    pub fn target_page(&self) -> Option<&PageId> {
        self.selected
            .as_ref()
            .or_else(|| self.pages.last().map(|p| &p.id))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Pages in display order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn filters(&self) -> &[BusFilter] {
        self.filters.filters()
    }

    pub fn time_floor(&self) -> Option<DepartureTime> {
        self.filters.time_floor()
    }

    /// Rows currently visible on a page, `None` for an unknown page.
    pub fn derived_rows(&self, id: &PageId) -> Option<&[Departure]> {
        self.derived.get(id).map(Vec::as_slice)
    }

    /// Rows currently visible on a page; empty for an unknown page.
    pub fn rows_or_empty(&self, id: &PageId) -> &[Departure] {
        self.derived_rows(id).unwrap_or(&[])
    }

    /// Every page's visible rows.
    pub fn derived(&self) -> &HashMap<PageId, Vec<Departure>> {
        &self.derived
    }

    /// Destinations served by a line on any page of this board.
    pub fn directions_for(&self, number: &str) -> Vec<String> {
        directions_for(number, self.pages.iter())
    }

    /// Whether another page fits under the plan's per-project limit.
    ///
    /// Advisory only; the store has the final say.
    pub fn can_add_page(&self, plan: Plan) -> bool {
        plan.timetable_limit()
            .is_none_or(|limit| self.pages.len() < limit)
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Re-derive the rows of every page from scratch.
    ///
    /// Entries for pages that no longer exist are dropped.
    pub fn recompute_all(&mut self) {
        let filters = self.filters.filters();
        let floor = self.filters.time_floor();
        self.derived = self
            .pages
            .iter()
            .map(|p| (p.id.clone(), derive_rows(&p.raw_departures, filters, floor)))
            .collect();
    }

    fn derive_page(&mut self, id: &PageId) {
        if let Some(page) = self.pages.get(id) {
            let rows = derive_rows(
                &page.raw_departures,
                self.filters.filters(),
                self.filters.time_floor(),
            );
            self.derived.insert(id.clone(), rows);
        }
    }

    fn mint_page_id(&mut self) -> PageId {
        loop {
            self.next_page += 1;
            let id = PageId::new(format!("temp-{}", self.next_page));
            if !self.pages.contains(&id) {
                return id;
            }
        }
    }
}
