//! Application state for the web layer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::board::BoardSession;
use crate::cache::CachedScheduleClient;
use crate::store::{Store, StoreError};

/// A board session shared between requests.
pub type SharedSession = Arc<Mutex<BoardSession>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached schedule provider client
    pub schedule: Arc<CachedScheduleClient>,

    pub store: Arc<Store>,

    /// Open board sessions by project id
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl AppState {
    pub fn new(schedule: CachedScheduleClient, store: Store) -> Self {
        Self {
            schedule: Arc::new(schedule),
            store: Arc::new(store),
            sessions: Arc::default(),
        }
    }

    /// The board session for a project the user owns.
    ///
    /// The first request for a project loads its pages from the store;
    /// later requests share that session.
    pub async fn session(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<SharedSession, StoreError> {
        // Ownership is checked on every request, not just the first
        self.store.project(user_id, project_id).await?;

        if let Some(session) = self.sessions.read().await.get(project_id) {
            return Ok(session.clone());
        }

        let pages = self.store.load_pages(user_id, project_id).await?;
        let mut sessions = self.sessions.write().await;
        // The project may have been deleted while the pages were loading
        self.store.project(user_id, project_id).await?;
        let session = sessions
            .entry(project_id.to_string())
            .or_insert_with(|| {
                debug!(project = %project_id, pages = pages.len(), "opened board session");
                Arc::new(Mutex::new(BoardSession::with_pages(pages)))
            })
            .clone();
        Ok(session)
    }

    /// Forget a project's session, e.g. after the project is deleted.
    pub async fn close_session(&self, project_id: &str) {
        self.sessions.write().await.remove(project_id);
    }
}
