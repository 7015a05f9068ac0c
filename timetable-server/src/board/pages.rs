//! Ordered, keyed collection of pages.

use std::collections::HashMap;

use crate::domain::{BoardError, Page, PageId, PagePatch};

/// The pages of a board, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    order: Vec<PageId>,
    by_id: HashMap<PageId, Page>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page. Rejects an id that is already live.
    pub fn push(&mut self, page: Page) -> Result<(), BoardError> {
        if self.by_id.contains_key(&page.id) {
            return Err(BoardError::DuplicateId(page.id.to_string()));
        }
        self.order.push(page.id.clone());
        self.by_id.insert(page.id.clone(), page);
        Ok(())
    }

    /// Remove a page, returning it.
    pub fn remove(&mut self, id: &PageId) -> Result<Page, BoardError> {
        let page = self
            .by_id
            .remove(id)
            .ok_or_else(|| BoardError::page_not_found(id))?;
        self.order.retain(|p| p != id);
        Ok(page)
    }

    /// Merge a patch into a page.
    pub fn update(&mut self, id: &PageId, patch: PagePatch) -> Result<&Page, BoardError> {
        let page = self
            .by_id
            .get_mut(id)
            .ok_or_else(|| BoardError::page_not_found(id))?;
        page.apply(patch);
        Ok(page)
    }

    /// Replace every page. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, pages: Vec<Page>) {
        self.order.clear();
        self.by_id.clear();
        for page in pages {
            if self.by_id.contains_key(&page.id) {
                tracing::warn!(page = %page.id, "dropping duplicate page id on replace");
                continue;
            }
            self.order.push(page.id.clone());
            self.by_id.insert(page.id.clone(), page);
        }
    }

    pub fn get(&self, id: &PageId) -> Option<&Page> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Pages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn last(&self) -> Option<&Page> {
        self.order.last().and_then(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
