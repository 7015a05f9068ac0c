//! Users, projects and timetables.
//!
//! All tables live in memory behind one lock. When the store is backed by a
//! snapshot file, every mutation rewrites the snapshot before the lock is
//! released, so the file never lags behind a reply the caller has seen.
//! A mutation whose snapshot write fails is not applied.

mod records;
mod snapshot;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{Page, PageId, PageInit, PagePatch};
use crate::quota::{self, QuotaExceeded};

pub use records::{Project, StoreData, Timetable, User};
pub use snapshot::Snapshot;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    QuotaExceeded(#[from] QuotaExceeded),

    #[error("not authorized to change {kind} {id}")]
    NotAuthorized { kind: &'static str, id: String },

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// The application's persistent data.
#[derive(Debug)]
pub struct Store {
    data: RwLock<StoreData>,
    snapshot: Option<Snapshot>,
}

impl Store {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if present.
    pub async fn open(snapshot: Snapshot) -> Result<Self, StoreError> {
        let data = snapshot.load().await?;
        info!(
            path = %snapshot.path().display(),
            users = data.users.len(),
            projects = data.projects.len(),
            timetables = data.timetables.len(),
            "loaded store"
        );
        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(snapshot),
        })
    }

    /// Apply a change and write the snapshot.
    ///
    /// The change is made on a copy and only becomes visible once the
    /// snapshot is written, so a failed write leaves the store as it was.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let value = change(&mut next)?;
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(&next).await?;
        }
        *data = next;
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Look up a user by email, creating a free account on first sight.
    pub async fn find_or_create_user(&self, email: &str) -> Result<User, StoreError> {
        let email = email.trim().to_lowercase();
        if let Some(user) = self.user_by_email(&email).await {
            return Ok(user);
        }

        let (user, created) = self
            .commit(|data| {
                // Another request may have created it since the lookup
                if let Some(user) = data.users.values().find(|u| u.email == email) {
                    return Ok((user.clone(), false));
                }
                let user = User {
                    id: data.mint_id("usr"),
                    email: email.clone(),
                    is_premium: false,
                    full_name: None,
                    created_at: now_millis(),
                };
                data.users.insert(user.id.clone(), user.clone());
                Ok((user, true))
            })
            .await?;
        if created {
            info!(user = %user.id, "created user");
        }
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.values().find(|u| u.email == email).cloned()
    }

    pub async fn set_premium(&self, id: &str, is_premium: bool) -> Result<User, StoreError> {
        self.commit(|data| {
            let user = data
                .users
                .get_mut(id)
                .ok_or_else(|| StoreError::not_found("user", id))?;
            user.is_premium = is_premium;
            Ok(user.clone())
        })
        .await
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// A user's projects, oldest first.
    pub async fn list_projects(&self, user_id: &str) -> Vec<Project> {
        let data = self.data.read().await;
        let mut projects: Vec<Project> = data
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        projects
    }

    /// A project, if it exists and belongs to the user.
    pub async fn project(&self, user_id: &str, project_id: &str) -> Result<Project, StoreError> {
        let data = self.data.read().await;
        owned_project(&data, user_id, project_id).cloned()
    }

    pub async fn create_project(&self, user_id: &str, name: &str) -> Result<Project, StoreError> {
        let project = self
            .commit(|data| {
                let plan = data
                    .users
                    .get(user_id)
                    .ok_or_else(|| StoreError::not_found("user", user_id))?
                    .plan();
                let existing = data
                    .projects
                    .values()
                    .filter(|p| p.user_id == user_id)
                    .count();
                quota::check_projects(plan, existing)?;

                let project = Project {
                    id: data.mint_id("prj"),
                    name: name.trim().to_string(),
                    user_id: user_id.to_string(),
                    created_at: now_millis(),
                };
                data.projects.insert(project.id.clone(), project.clone());
                Ok(project)
            })
            .await?;
        info!(user = %user_id, project = %project.id, "created project");
        Ok(project)
    }

    /// Delete a project and every timetable in it.
    ///
    /// Returns how many timetables went with it.
    pub async fn delete_project(&self, user_id: &str, project_id: &str) -> Result<usize, StoreError> {
        let removed = self
            .commit(|data| {
                owned_project(data, user_id, project_id)?;
                data.projects.remove(project_id);
                let before = data.timetables.len();
                data.timetables.retain(|t| t.project_id != project_id);
                Ok(before - data.timetables.len())
            })
            .await?;
        info!(user = %user_id, project = %project_id, timetables = removed, "deleted project");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Timetables
    // ------------------------------------------------------------------

    /// A project's timetables as pages, in creation order.
    pub async fn load_pages(&self, user_id: &str, project_id: &str) -> Result<Vec<Page>, StoreError> {
        let data = self.data.read().await;
        owned_project(&data, user_id, project_id)?;
        Ok(data
            .timetables
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(Timetable::to_page)
            .collect())
    }

    /// Persist a new page. Any id in `init` is replaced by a durable one.
    pub async fn create_page(
        &self,
        user_id: &str,
        project_id: &str,
        init: PageInit,
    ) -> Result<Page, StoreError> {
        let page = self
            .commit(|data| {
                owned_project(data, user_id, project_id)?;
                let plan = data
                    .users
                    .get(user_id)
                    .ok_or_else(|| StoreError::not_found("user", user_id))?
                    .plan();
                let existing = data
                    .timetables
                    .iter()
                    .filter(|t| t.project_id == project_id)
                    .count();
                quota::check_timetables(plan, existing)?;

                let id = data.mint_id("tt");
                let timetable = Timetable::from_init(id, project_id.to_string(), init, now_millis());
                let page = timetable.to_page();
                data.timetables.push(timetable);
                Ok(page)
            })
            .await?;
        debug!(project = %project_id, page = %page.id, "created timetable");
        Ok(page)
    }

    pub async fn update_page(
        &self,
        user_id: &str,
        page_id: &PageId,
        patch: PagePatch,
    ) -> Result<(), StoreError> {
        self.commit(|data| {
            let index = owned_timetable(data, user_id, page_id)?;
            data.timetables[index].apply(patch);
            Ok(())
        })
        .await?;
        debug!(page = %page_id, "updated timetable");
        Ok(())
    }

    pub async fn delete_page(&self, user_id: &str, page_id: &PageId) -> Result<(), StoreError> {
        self.commit(|data| {
            let index = owned_timetable(data, user_id, page_id)?;
            data.timetables.remove(index);
            Ok(())
        })
        .await?;
        debug!(page = %page_id, "deleted timetable");
        Ok(())
    }
}

/// Someone else's project is reported as missing.
fn owned_project<'a>(
    data: &'a StoreData,
    user_id: &str,
    project_id: &str,
) -> Result<&'a Project, StoreError> {
    data.projects
        .get(project_id)
        .filter(|p| p.user_id == user_id)
        .ok_or_else(|| StoreError::not_found("project", project_id))
}

/// Index of a timetable the user may change.
fn owned_timetable(data: &StoreData, user_id: &str, page_id: &PageId) -> Result<usize, StoreError> {
    let index = data
        .timetables
        .iter()
        .position(|t| t.id == page_id.as_str())
        .ok_or_else(|| StoreError::not_found("timetable", page_id.as_str()))?;

    let owner = data
        .projects
        .get(&data.timetables[index].project_id)
        .map(|p| p.user_id.as_str());
    if owner != Some(user_id) {
        return Err(StoreError::NotAuthorized {
            kind: "timetable",
            id: page_id.to_string(),
        });
    }
    Ok(index)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
