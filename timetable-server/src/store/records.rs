//! Persisted records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Departure, Page, PageId, PageInit, PagePatch, Theme};
use crate::quota::Plan;

/// An account, identified by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_premium: bool,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Unix milliseconds.
    pub created_at: i64,
}

impl User {
    pub fn plan(&self) -> Plan {
        Plan::from_premium(self.is_premium)
    }
}

/// A named set of timetables owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: i64,
}

/// A persisted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub id: String,
    pub project_id: String,
    pub stop_name: String,
    pub stop_id: String,
    pub theme: Theme,
    #[serde(default)]
    pub data: Vec<Departure>,
    pub created_at: i64,
}

impl Timetable {
    pub(super) fn from_init(id: String, project_id: String, init: PageInit, created_at: i64) -> Self {
        // Reuse the page defaults so stored and local pages agree
        let page = Page::from_init(PageId::new(id), PageInit { id: None, ..init });
        Self {
            id: page.id.as_str().to_string(),
            project_id,
            stop_name: page.stop_name,
            stop_id: page.stop_id,
            theme: page.theme,
            data: page.raw_departures,
            created_at,
        }
    }

    pub(super) fn apply(&mut self, patch: PagePatch) {
        if let Some(stop_name) = patch.stop_name {
            self.stop_name = stop_name;
        }
        if let Some(stop_id) = patch.stop_id {
            self.stop_id = stop_id;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(data) = patch.raw_departures {
            self.data = data;
        }
    }

    pub fn to_page(&self) -> Page {
        Page {
            id: PageId::new(self.id.clone()),
            stop_name: self.stop_name.clone(),
            stop_id: self.stop_id.clone(),
            theme: self.theme,
            raw_departures: self.data.clone(),
        }
    }
}

/// Everything the store holds; also the snapshot file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub(super) next_id: u64,
    #[serde(default)]
    pub(super) users: HashMap<String, User>,
    #[serde(default)]
    pub(super) projects: HashMap<String, Project>,
    /// In creation order.
    #[serde(default)]
    pub(super) timetables: Vec<Timetable>,
}

impl StoreData {
    pub(super) fn mint_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}
