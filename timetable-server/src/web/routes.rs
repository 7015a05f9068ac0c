//! HTTP route handlers.

use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post, put},
};
use chrono::Local;
use futures::future::join_all;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::board::BoardSession;
use crate::domain::{FilterId, FilterPatch, PageId, PageInit, PagePatch};
use crate::quota::{self, Plan};
use crate::schedule::{ScheduleFetch, ScheduleOrigin, fetch_or_demo};
use crate::store::{StoreError, User};

use super::dto::*;
use super::error::AppError;
use super::identity::Principal;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/projects/:project/print", get(print_project))
        .route("/api/me", get(me))
        .route("/api/stops/search", get(search_stops))
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:project",
            get(get_project).delete(delete_project),
        )
        .route("/api/projects/:project/board", get(get_board))
        .route("/api/projects/:project/stop", post(choose_stop))
        .route("/api/projects/:project/refresh", post(refresh_all))
        .route("/api/projects/:project/pages", post(create_page))
        .route(
            "/api/projects/:project/pages/:page",
            patch(update_page).delete(delete_page),
        )
        .route("/api/projects/:project/pages/:page/stop", post(set_page_stop))
        .route("/api/projects/:project/pages/:page/refresh", post(refresh_page))
        .route("/api/projects/:project/selection", put(set_selection))
        .route("/api/projects/:project/time-floor", put(set_time_floor))
        .route(
            "/api/projects/:project/filters",
            post(add_filter).delete(clear_filters),
        )
        .route(
            "/api/projects/:project/filters/:filter",
            patch(update_filter).delete(remove_filter),
        )
        .route(
            "/api/projects/:project/filters/:filter/directions",
            get(directions),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

// ============================================================================
// Account and projects
// ============================================================================

async fn dashboard(
    State(state): State<AppState>,
    Principal(user): Principal,
) -> DashboardTemplate {
    let projects = state.store.list_projects(&user.id).await;
    DashboardTemplate::new(&user, projects)
}

async fn me(Principal(user): Principal) -> Json<MeResponse> {
    Json(MeResponse::from_user(&user))
}

/// Stop suggestions for a search term. Provider failures give no
/// suggestions rather than an error.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Json<StopSearchResponse> {
    let stops = match state.schedule.stops(&req.q).await {
        Ok(stops) => stops.as_ref().clone(),
        Err(e) => {
            warn!(term = %req.q, error = %e, "stop search failed");
            Vec::new()
        }
    };
    Json(StopSearchResponse { stops })
}

async fn list_projects(
    State(state): State<AppState>,
    Principal(user): Principal,
) -> Json<ProjectListResponse> {
    Json(ProjectListResponse {
        projects: state.store.list_projects(&user.id).await,
    })
}

async fn create_project(
    State(state): State<AppState>,
    Principal(user): Principal,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("Project name is required"));
    }
    let project = state.store.create_project(&user.id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(project)).into_response())
}

async fn get_project(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let project = state.store.project(&user.id, &project_id).await?;
    Ok(Json(project).into_response())
}

async fn delete_project(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
) -> Result<Json<DeleteProjectResponse>, AppError> {
    let deleted_timetables = state.store.delete_project(&user.id, &project_id).await?;
    state.close_session(&project_id).await;
    Ok(Json(DeleteProjectResponse { deleted_timetables }))
}

/// All pages of a project as a printable document.
async fn print_project(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let project = state.store.project(&user.id, &project_id).await?;
    let shared = state.session(&user.id, &project_id).await?;
    let session = shared.lock().await;

    let template = PrintTemplate {
        project_name: project.name,
        pages: PageView::all(&session),
        printed_on: Local::now().format("%d.%m.%Y").to_string(),
    };
    Ok(Html(template.render()?).into_response())
}

// ============================================================================
// Board
// ============================================================================

/// Whether a change reached the store.
struct Saved {
    persisted: bool,
    warning: Option<String>,
}

impl Saved {
    fn yes() -> Self {
        Self {
            persisted: true,
            warning: None,
        }
    }

    fn no(warning: String) -> Self {
        warn!("{warning}");
        Self {
            persisted: false,
            warning: Some(warning),
        }
    }

    fn from_result(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::yes(),
            Err(e) => Self::no(format!("Change not saved: {e}")),
        }
    }

    /// Both changes saved; keeps the first warning.
    fn and(self, other: Saved) -> Self {
        Self {
            persisted: self.persisted && other.persisted,
            warning: self.warning.or(other.warning),
        }
    }
}

fn board_reply(
    headers: &HeaderMap,
    project_id: &str,
    session: &BoardSession,
    plan: Plan,
) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let html = BoardTemplate::from_session(project_id, session, plan).render()?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(BoardResponse::from_session(project_id, session, plan)).into_response())
    }
}

fn update_reply(
    project_id: &str,
    session: &BoardSession,
    plan: Plan,
    saved: Saved,
    origin: Option<ScheduleOrigin>,
) -> Json<BoardUpdateResponse> {
    Json(BoardUpdateResponse {
        board: BoardResponse::from_session(project_id, session, plan),
        persisted: saved.persisted,
        warning: saved.warning,
        origin,
    })
}

/// Write a page change through to the store. Pages that were never saved
/// stay local.
async fn save_page(state: &AppState, user: &User, id: &PageId, patch: PagePatch) -> Saved {
    if id.is_temporary() {
        return Saved::no(format!("Page {id} has not been saved"));
    }
    Saved::from_result(state.store.update_page(&user.id, id, patch).await)
}

async fn get_board(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let session = shared.lock().await;
    board_reply(&headers, &project_id, &session, user.plan())
}

/// Add a page to the board, saving it first so it gets a durable id.
///
/// If the store cannot be written the page is kept under a temporary id.
async fn add_page(
    state: &AppState,
    user: &User,
    project_id: &str,
    session: &mut BoardSession,
    mut init: PageInit,
) -> Result<(PageId, Saved), AppError> {
    init.id = None;
    quota::check_timetables(user.plan(), session.page_count())?;

    match state.store.create_page(&user.id, project_id, init.clone()).await {
        Ok(page) => {
            let id = session.add_page(Some(PageInit::from_page(&page)))?;
            Ok((id, Saved::yes()))
        }
        Err(e @ (StoreError::Io(_) | StoreError::Serde(_))) => {
            let id = session.add_page(Some(init))?;
            let saved = Saved::no(format!("Page {id} not saved: {e}"));
            Ok((id, saved))
        }
        Err(e) => Err(e.into()),
    }
}

async fn create_page(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
    Json(init): Json<PageInit>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    let (_, saved) = add_page(&state, &user, &project_id, &mut session, init).await?;
    Ok(update_reply(&project_id, &session, user.plan(), saved, None))
}

async fn update_page(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path((project_id, page_id)): Path<(String, PageId)>,
    Json(patch): Json<PagePatch>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    if patch.is_empty() {
        return Err(AppError::bad_request("Nothing to update"));
    }
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.update_page(&page_id, patch.clone())?;

    let saved = save_page(&state, &user, &page_id, patch).await;
    Ok(update_reply(&project_id, &session, user.plan(), saved, None))
}

async fn delete_page(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path((project_id, page_id)): Path<(String, PageId)>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.remove_page(&page_id)?;

    let saved = if page_id.is_temporary() {
        Saved::yes()
    } else {
        Saved::from_result(state.store.delete_page(&user.id, &page_id).await)
    };
    Ok(update_reply(&project_id, &session, user.plan(), saved, None))
}

/// Fetch a stop's departures and put them on a page.
///
/// The fetch runs without holding the session lock.
async fn load_stop(
    state: &AppState,
    user: &User,
    project_id: &str,
    page_id: PageId,
    stop_name: String,
    stop_id: String,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, project_id).await?;
    let time_floor = {
        let session = shared.lock().await;
        if session.page(&page_id).is_none() {
            return Err(crate::domain::BoardError::page_not_found(&page_id).into());
        }
        session.time_floor()
    };

    let fetch = fetch_or_demo(state.schedule.as_ref(), &stop_id, &stop_name, time_floor).await;
    let origin = fetch.origin;
    let patch = PagePatch::stop(stop_name, stop_id, fetch.departures);

    let mut session = shared.lock().await;
    // The page may have been removed while fetching
    session.update_page(&page_id, patch.clone())?;
    let saved = save_page(state, user, &page_id, patch).await;
    Ok(update_reply(project_id, &session, user.plan(), saved, Some(origin)))
}

/// Put a chosen stop on the selected page, else the last page, else a new
/// page.
async fn choose_stop(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
    Json(req): Json<SelectStopRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let (page_id, created) = {
        let mut session = shared.lock().await;
        match session.target_page().cloned() {
            Some(id) => (id, None),
            None => {
                let (id, saved) =
                    add_page(&state, &user, &project_id, &mut session, PageInit::default()).await?;
                (id, Some(saved))
            }
        }
    };

    let reply = load_stop(&state, &user, &project_id, page_id, req.stop_name, req.stop_id).await?;
    Ok(match created {
        Some(created) => {
            let Json(mut response) = reply;
            let saved = created.and(Saved {
                persisted: response.persisted,
                warning: response.warning.take(),
            });
            response.persisted = saved.persisted;
            response.warning = saved.warning;
            Json(response)
        }
        None => reply,
    })
}

async fn set_page_stop(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path((project_id, page_id)): Path<(String, PageId)>,
    Json(req): Json<SelectStopRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    load_stop(&state, &user, &project_id, page_id, req.stop_name, req.stop_id).await
}

/// Re-fetch a page's stop with the current time floor.
async fn refresh_page(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path((project_id, page_id)): Path<(String, PageId)>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let (stop_name, stop_id) = {
        let session = shared.lock().await;
        let page = session
            .page(&page_id)
            .ok_or_else(|| crate::domain::BoardError::page_not_found(&page_id))?;
        if !page.has_stop() {
            return Err(AppError::bad_request(format!("Page {page_id} has no stop")));
        }
        (page.stop_name.clone(), page.stop_id.clone())
    };
    load_stop(&state, &user, &project_id, page_id, stop_name, stop_id).await
}

/// Re-fetch every page that has a stop, concurrently.
async fn refresh_all(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(project_id): Path<String>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let (stops, time_floor) = {
        let session = shared.lock().await;
        let stops: Vec<(PageId, String, String)> = session
            .pages()
            .filter(|p| p.has_stop())
            .map(|p| (p.id.clone(), p.stop_name.clone(), p.stop_id.clone()))
            .collect();
        (stops, session.time_floor())
    };

    let fetches: Vec<ScheduleFetch> = join_all(stops.iter().map(|(_, name, id)| {
        fetch_or_demo(state.schedule.as_ref(), id, name, time_floor)
    }))
    .await;
    let origin = if fetches.iter().any(ScheduleFetch::is_demo) {
        ScheduleOrigin::Demo
    } else {
        ScheduleOrigin::Provider
    };

    let mut session = shared.lock().await;
    let mut saved = Saved::yes();
    for ((page_id, _, _), fetch) in stops.into_iter().zip(fetches) {
        let patch = PagePatch::departures(fetch.departures);
        if session.update_page(&page_id, patch.clone()).is_err() {
            // Removed while fetching
            continue;
        }
        saved = saved.and(save_page(&state, &user, &page_id, patch).await);
    }
    info!(project = %project_id, pages = session.page_count(), "refreshed board");

    Ok(update_reply(&project_id, &session, user.plan(), saved, Some(origin)))
}

async fn set_selection(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<SelectionRequest>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.select(req.page.as_ref())?;
    board_reply(&headers, &project_id, &session, user.plan())
}

// ============================================================================
// Filters
// ============================================================================

async fn add_filter(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<AddFilterRequest>,
) -> Result<Response, AppError> {
    let number = req.number.trim();
    if number.is_empty() {
        return Err(AppError::bad_request("Bus number is required"));
    }
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.add_filter(number, req.direction);
    board_reply(&headers, &project_id, &session, user.plan())
}

async fn update_filter(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path((project_id, filter_id)): Path<(String, FilterId)>,
    Json(patch): Json<FilterPatch>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.update_filter(&filter_id, patch)?;
    board_reply(&headers, &project_id, &session, user.plan())
}

async fn remove_filter(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path((project_id, filter_id)): Path<(String, FilterId)>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.remove_filter(&filter_id)?;
    board_reply(&headers, &project_id, &session, user.plan())
}

async fn clear_filters(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.clear_filters();
    board_reply(&headers, &project_id, &session, user.plan())
}

async fn set_time_floor(
    State(state): State<AppState>,
    Principal(user): Principal,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<TimeFloorRequest>,
) -> Result<Response, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let mut session = shared.lock().await;
    session.set_time_filter(&req.time)?;
    board_reply(&headers, &project_id, &session, user.plan())
}

/// Destinations a line serves on this board, for the direction picker.
async fn directions(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path((project_id, number)): Path<(String, String)>,
) -> Result<Json<DirectionsResponse>, AppError> {
    let shared = state.session(&user.id, &project_id).await?;
    let session = shared.lock().await;
    let directions = session.directions_for(&number);
    Ok(Json(DirectionsResponse { number, directions }))
}
