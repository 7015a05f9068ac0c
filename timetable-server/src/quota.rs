//! Free and premium plan limits.
//!
//! The store enforces these on every create. The board session checks them
//! too, so a full board can say so before a round trip.

use serde::Serialize;

/// Projects a free account may own.
pub const FREE_PROJECT_LIMIT: usize = 1;

/// Timetables a free account may keep in one project.
pub const FREE_TIMETABLE_LIMIT: usize = 3;

/// Account tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    pub fn from_premium(is_premium: bool) -> Self {
        if is_premium { Plan::Premium } else { Plan::Free }
    }

    /// Maximum projects, `None` when unlimited.
    pub fn project_limit(&self) -> Option<usize> {
        match self {
            Plan::Free => Some(FREE_PROJECT_LIMIT),
            Plan::Premium => None,
        }
    }

    /// Maximum timetables per project, `None` when unlimited.
    pub fn timetable_limit(&self) -> Option<usize> {
        match self {
            Plan::Free => Some(FREE_TIMETABLE_LIMIT),
            Plan::Premium => None,
        }
    }
}

/// A create would take the account over its plan limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuotaExceeded {
    #[error(
        "Free accounts can only create one project. Please delete an existing project first."
    )]
    Projects { limit: usize },

    #[error("You can only create {limit} timetables per project")]
    Timetables { limit: usize },
}

/// Check whether one more project fits, given how many exist.
pub fn check_projects(plan: Plan, existing: usize) -> Result<(), QuotaExceeded> {
    match plan.project_limit() {
        Some(limit) if existing >= limit => Err(QuotaExceeded::Projects { limit }),
        _ => Ok(()),
    }
}

/// Check whether one more timetable fits in a project, given how many exist.
pub fn check_timetables(plan: Plan, existing: usize) -> Result<(), QuotaExceeded> {
    match plan.timetable_limit() {
        Some(limit) if existing >= limit => Err(QuotaExceeded::Timetables { limit }),
        _ => Ok(()),
    }
}
