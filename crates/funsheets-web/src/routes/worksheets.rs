//! Worksheet history routes.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{kid, worksheet, DatabaseError, Difficulty, WorksheetDetail, WorksheetStatus, WorksheetSummary};
use serde::Deserialize;
use tracing::{debug, info};
use worksheet_gen::subject_name;

use crate::error::{Result, WebError};
use crate::routes::generator::{generate_for_child, WorksheetPlan};
use crate::session::Session;
use crate::state::AppState;

/// History filters. Absent, empty, or `all` means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub search: Option<String>,
    pub child: Option<String>,
    pub subject: Option<String>,
    pub status: Option<String>,
    pub difficulty: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Parsed form of [`HistoryQuery`].
#[derive(Debug)]
pub(crate) struct HistoryFilter {
    search: Option<String>,
    child: Option<String>,
    subject: Option<String>,
    status: Option<WorksheetStatus>,
    difficulty: Option<Difficulty>,
}

impl HistoryFilter {
    pub(crate) fn parse(query: &HistoryQuery) -> Result<Self> {
        Ok(Self {
            search: active(&query.search).map(str::to_lowercase),
            child: active(&query.child).map(str::to_string),
            subject: active(&query.subject).map(str::to_string),
            status: active(&query.status)
                .map(str::parse::<WorksheetStatus>)
                .transpose()?,
            difficulty: active(&query.difficulty)
                .map(str::parse::<Difficulty>)
                .transpose()?,
        })
    }

    fn matches(&self, ws: &WorksheetSummary) -> bool {
        if let Some(search) = &self.search {
            let hit = ws.title.to_lowercase().contains(search)
                || ws.subject.to_lowercase().contains(search);
            if !hit {
                return false;
            }
        }
        if let Some(child) = &self.child {
            if ws.child_id.as_deref() != Some(child.as_str()) {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            // Accept a catalog id or the stored display name.
            let hit = ws.subject.eq_ignore_ascii_case(subject) || ws.subject == subject_name(subject);
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != ws.status) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != ws.difficulty) {
            return false;
        }
        true
    }

    pub(crate) fn apply(&self, worksheets: Vec<WorksheetSummary>) -> Vec<WorksheetSummary> {
        worksheets.into_iter().filter(|ws| self.matches(ws)).collect()
    }
}

async fn load(state: &AppState, id: &str, parent_id: &str) -> Result<WorksheetDetail> {
    worksheet::get_worksheet(state.db.pool(), id, parent_id)
        .await?
        .ok_or_else(|| WebError::NotFound("Worksheet".to_string()))
}

/// Filtered history listing, newest first.
pub(crate) async fn history(
    state: &AppState,
    parent_id: &str,
    query: &HistoryQuery,
) -> Result<Vec<WorksheetSummary>> {
    let filter = HistoryFilter::parse(query)?;
    let all = worksheet::list_worksheets(state.db.pool(), parent_id).await?;
    Ok(filter.apply(all))
}

/// List worksheets.
pub async fn list_api(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WorksheetSummary>>> {
    let worksheets = history(&state, session.parent_id()?, &query).await?;
    Ok(Json(worksheets))
}

/// One worksheet with its content.
pub async fn get_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<WorksheetDetail>> {
    Ok(Json(load(&state, &id, session.parent_id()?).await?))
}

/// `<Subject>_Worksheet_<Child>.txt`, reduced to header-safe characters.
pub(crate) fn download_filename(ws: &WorksheetSummary) -> String {
    let raw = format!("{}_Worksheet_{}.txt", ws.subject, ws.child_name);
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Download the worksheet as text. A `New` worksheet becomes `Downloaded`.
pub async fn download_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let parent_id = session.parent_id()?;
    let ws = load(&state, &id, parent_id).await?;

    if ws.summary.status == WorksheetStatus::New {
        match worksheet::update_status(
            state.db.pool(),
            &id,
            parent_id,
            WorksheetStatus::Downloaded,
            state.status_policy,
        )
        .await
        {
            Ok(_) => info!(worksheet_id = %id, "Worksheet downloaded"),
            // Moved past New by another request in the meantime.
            Err(DatabaseError::InvalidTransition { from, .. }) => {
                debug!(worksheet_id = %id, status = %from, "Download left status unchanged")
            }
            Err(err) => return Err(err.into()),
        }
    }

    let disposition = format!("attachment; filename=\"{}\"", download_filename(&ws.summary));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ws.content,
    )
        .into_response())
}

/// Mark a worksheet completed.
pub async fn complete_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<WorksheetDetail>> {
    let parent_id = session.parent_id()?;
    let previous = worksheet::update_status(
        state.db.pool(),
        &id,
        parent_id,
        WorksheetStatus::Completed,
        state.status_policy,
    )
    .await?;
    info!(worksheet_id = %id, from = %previous, "Worksheet completed");

    Ok(Json(load(&state, &id, parent_id).await?))
}

/// Generate a fresh worksheet with the same child, subject, difficulty and
/// instructions. The original is left untouched.
pub async fn regenerate_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<WorksheetDetail>)> {
    let parent_id = session.parent_id()?;
    let source = load(&state, &id, parent_id).await?;

    let child_id = source
        .summary
        .child_id
        .as_deref()
        .ok_or_else(|| WebError::NotFound("Child".to_string()))?;
    let child = kid::get_kid(state.db.pool(), child_id, parent_id).await?;

    let plan = WorksheetPlan {
        subject: source.summary.subject,
        difficulty: source.summary.difficulty,
        instructions: source.topic,
        regenerated_from: Some(source.summary.id),
    };
    let created = generate_for_child(&state, parent_id, &child, plan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
