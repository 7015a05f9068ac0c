//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::BoardSession;
use crate::domain::{BusFilter, Departure, DepartureTime, PageId, Theme};
use crate::quota::Plan;
use crate::schedule::{ScheduleOrigin, StopSuggestion};
use crate::store::{Project, User};

/// Query for the stop search endpoint.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopSuggestion>,
}

/// The signed-in user and what their plan allows.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub is_premium: bool,
    pub plan: Plan,
    /// Unix milliseconds.
    pub created_at: i64,
    /// `None` when unlimited.
    pub project_limit: Option<usize>,
    pub timetable_limit: Option<usize>,
}

impl MeResponse {
    pub fn from_user(user: &User) -> Self {
        let plan = user.plan();
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            is_premium: user.is_premium,
            plan,
            created_at: user.created_at,
            project_limit: plan.project_limit(),
            timetable_limit: plan.timetable_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    pub deleted_timetables: usize,
}

/// A stop chosen from the search suggestions.
#[derive(Debug, Deserialize)]
pub struct SelectStopRequest {
    pub stop_name: String,
    #[serde(default)]
    pub stop_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub page: Option<PageId>,
}

#[derive(Debug, Deserialize)]
pub struct AddFilterRequest {
    pub number: String,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimeFloorRequest {
    /// `HH:MM`, or blank to clear.
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub number: String,
    pub directions: Vec<String>,
}

/// One page as shown on the board.
#[derive(Debug, Serialize)]
pub struct PageResult {
    pub id: PageId,
    pub stop_name: String,
    pub stop_id: String,
    pub theme: Theme,
    pub selected: bool,
    /// Departures as fetched.
    pub raw_count: usize,
    /// Departures left after the display cap and filters.
    pub rows: Vec<Departure>,
}

/// Everything a client needs to draw a project's board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub project_id: String,
    pub pages: Vec<PageResult>,
    pub filters: Vec<BusFilter>,
    pub time_floor: Option<DepartureTime>,
    pub selected: Option<PageId>,
    /// Whether the plan leaves room for another page.
    pub can_add_page: bool,
}

impl BoardResponse {
    pub fn from_session(project_id: &str, session: &BoardSession, plan: Plan) -> Self {
        let selected = session.selected();
        let pages = session
            .pages()
            .map(|page| PageResult {
                id: page.id.clone(),
                stop_name: page.stop_name.clone(),
                stop_id: page.stop_id.clone(),
                theme: page.theme,
                selected: selected == Some(&page.id),
                raw_count: page.raw_departures.len(),
                rows: session.rows_or_empty(&page.id).to_vec(),
            })
            .collect();

        Self {
            project_id: project_id.to_string(),
            pages,
            filters: session.filters().to_vec(),
            time_floor: session.time_floor(),
            selected: selected.cloned(),
            can_add_page: session.can_add_page(plan),
        }
    }
}

/// Result of a board change that is also written to the store.
///
/// The board reflects the change even when `persisted` is false.
#[derive(Debug, Serialize)]
pub struct BoardUpdateResponse {
    #[serde(flatten)]
    pub board: BoardResponse,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Set when the change fetched departures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ScheduleOrigin>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
