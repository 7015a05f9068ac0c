//! Timetable pages (boards).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Departure;

/// Stop name shown on a freshly created page.
pub const PLACEHOLDER_STOP_NAME: &str = "Select a stop...";

/// Opaque page identifier, unique among the live pages of a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id was minted locally and never persisted.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with("temp-")
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visual theme of a printed board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Color,
    Bw,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Color => "color",
            Theme::Bw => "bw",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timetable board for one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub stop_name: String,
    pub stop_id: String,
    pub theme: Theme,
    /// Departures as fetched, in provider order.
    pub raw_departures: Vec<Departure>,
}

impl Page {
    /// Build a page from initial values, filling in defaults.
    pub fn from_init(id: PageId, init: PageInit) -> Self {
        Self {
            id,
            stop_name: init
                .stop_name
                .unwrap_or_else(|| PLACEHOLDER_STOP_NAME.to_string()),
            stop_id: init.stop_id.unwrap_or_default(),
            theme: init.theme.unwrap_or_default(),
            raw_departures: init.raw_departures.unwrap_or_default(),
        }
    }

    /// Merge a patch into this page.
    pub fn apply(&mut self, patch: PagePatch) {
        if let Some(stop_name) = patch.stop_name {
            self.stop_name = stop_name;
        }
        if let Some(stop_id) = patch.stop_id {
            self.stop_id = stop_id;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(raw) = patch.raw_departures {
            self.raw_departures = raw;
        }
    }

    /// Whether a stop has been chosen for this page.
    pub fn has_stop(&self) -> bool {
        !self.stop_id.is_empty()
    }
}

/// Initial values for a new page. Anything left out gets the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInit {
    /// Use this id instead of minting a temporary one.
    #[serde(default)]
    pub id: Option<PageId>,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub raw_departures: Option<Vec<Departure>>,
}

impl PageInit {
    /// Initial values reproducing an existing page, id included.
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: Some(page.id.clone()),
            stop_name: Some(page.stop_name.clone()),
            stop_id: Some(page.stop_id.clone()),
            theme: Some(page.theme),
            raw_departures: Some(page.raw_departures.clone()),
        }
    }
}

/// Partial update of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub raw_departures: Option<Vec<Departure>>,
}

impl PagePatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn departures(raw: Vec<Departure>) -> Self {
        Self {
            raw_departures: Some(raw),
            ..Self::default()
        }
    }

    /// Patch produced by choosing a stop: name, id and its schedule.
    pub fn stop(stop_name: impl Into<String>, stop_id: impl Into<String>, raw: Vec<Departure>) -> Self {
        Self {
            stop_name: Some(stop_name.into()),
            stop_id: Some(stop_id.into()),
            theme: None,
            raw_departures: Some(raw),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stop_name.is_none()
            && self.stop_id.is_none()
            && self.theme.is_none()
            && self.raw_departures.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DepartureTime;

    #[test]
    fn defaults_from_empty_init() {
        let page = Page::from_init(PageId::new("temp-1"), PageInit::default());
        assert_eq!(page.stop_name, PLACEHOLDER_STOP_NAME);
        assert_eq!(page.stop_id, "");
        assert_eq!(page.theme, Theme::Color);
        assert!(page.raw_departures.is_empty());
        assert!(!page.has_stop());
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut page = Page::from_init(PageId::new("p"), PageInit::default());
        page.apply(PagePatch::theme(Theme::Bw));
        assert_eq!(page.theme, Theme::Bw);
        assert_eq!(page.stop_name, PLACEHOLDER_STOP_NAME);

        let row = Departure::new(DepartureTime::new(9, 0).unwrap(), "7", "City Hall");
        page.apply(PagePatch::stop("Bouchet", "8587061", vec![row.clone()]));
        assert_eq!(page.stop_name, "Bouchet");
        assert_eq!(page.stop_id, "8587061");
        assert_eq!(page.theme, Theme::Bw);
        assert_eq!(page.raw_departures, vec![row]);
    }

    #[test]
    fn theme_serde() {
        assert_eq!(serde_json::to_string(&Theme::Bw).unwrap(), "\"bw\"");
        assert_eq!(serde_json::to_string(&Theme::Color).unwrap(), "\"color\"");
        let parsed: Theme = serde_json::from_str("\"bw\"").unwrap();
        assert_eq!(parsed, Theme::Bw);
    }

    #[test]
    fn temporary_ids() {
        assert!(PageId::new("temp-3").is_temporary());
        assert!(!PageId::new("tt-3").is_temporary());
    }

    #[test]
    fn patch_is_empty() {
        assert!(PagePatch::default().is_empty());
        assert!(!PagePatch::theme(Theme::Bw).is_empty());
    }
}
