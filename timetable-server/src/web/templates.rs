//! Askama templates for the web frontend.

use askama::Template;

use crate::board::BoardSession;
use crate::domain::{Departure, Theme};
use crate::quota::Plan;
use crate::store::{Project, User};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The signed-in user's projects.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub plan: Plan,
    pub projects: Vec<Project>,
    pub can_create_project: bool,
}

impl DashboardTemplate {
    pub fn new(user: &User, projects: Vec<Project>) -> Self {
        let plan = user.plan();
        let can_create_project = plan.project_limit().is_none_or(|limit| projects.len() < limit);
        Self {
            email: user.email.clone(),
            plan,
            projects,
            can_create_project,
        }
    }

    pub fn plan_label(&self) -> &'static str {
        match self.plan {
            Plan::Free => "Free",
            Plan::Premium => "Premium",
        }
    }
}

/// Printable document with every page of a project, one per sheet.
#[derive(Template)]
#[template(path = "print.html")]
pub struct PrintTemplate {
    pub project_name: String,
    pub pages: Vec<PageView>,
    /// Shown in each page footer.
    pub printed_on: String,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// The board of one project.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub project_id: String,
    pub pages: Vec<PageView>,
    pub filters: Vec<FilterView>,
    pub time_floor: Option<String>,
    pub can_add_page: bool,
}

impl BoardTemplate {
    pub fn from_session(project_id: &str, session: &BoardSession, plan: Plan) -> Self {
        Self {
            project_id: project_id.to_string(),
            pages: PageView::all(session),
            filters: session
                .filters()
                .iter()
                .map(|f| FilterView {
                    id: f.id.to_string(),
                    number: f.number.clone(),
                    direction: f.direction.clone(),
                })
                .collect(),
            time_floor: session.time_floor().map(|t| t.to_string()),
            can_add_page: session.can_add_page(plan),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

#[derive(Debug, Clone)]
pub struct PageView {
    pub id: String,
    pub stop_name: String,
    pub theme: Theme,
    pub selected: bool,
    pub rows: Vec<RowView>,
}

impl PageView {
    /// Every page of a session, in display order.
    pub fn all(session: &BoardSession) -> Vec<Self> {
        let selected = session.selected();
        session
            .pages()
            .map(|page| PageView {
                id: page.id.to_string(),
                stop_name: page.stop_name.clone(),
                theme: page.theme,
                selected: selected == Some(&page.id),
                rows: session
                    .rows_or_empty(&page.id)
                    .iter()
                    .map(RowView::from_departure)
                    .collect(),
            })
            .collect()
    }

    /// CSS class for the page's theme.
    pub fn theme_class(&self) -> &'static str {
        match self.theme {
            Theme::Color => "theme-color",
            Theme::Bw => "theme-bw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowView {
    pub time: String,
    pub bus_number: String,
    pub destination: String,
}

impl RowView {
    pub fn from_departure(d: &Departure) -> Self {
        Self {
            time: d.time.to_string(),
            bus_number: d.bus_number.clone(),
            destination: d.destination.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterView {
    pub id: String,
    pub number: String,
    pub direction: Option<String>,
}

impl FilterView {
    pub fn label(&self) -> String {
        match &self.direction {
            Some(direction) => format!("{} → {}", self.number, direction),
            None => self.number.clone(),
        }
    }
}
