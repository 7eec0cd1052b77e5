//! Child profile routes (dashboard).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::validation::{validate_age, validate_child_name};
use database::{kid, ChildProfile, ChildProfileInput};
use tracing::info;

use crate::error::Result;
use crate::session::Session;
use crate::state::AppState;

/// Form checks done before any store call: name present, age present and
/// in range.
fn validate_form(input: &ChildProfileInput) -> Result<()> {
    validate_child_name(&input.name)?;
    validate_age(input.age)?;
    Ok(())
}

/// List the signed-in parent's children.
pub async fn list_api(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ChildProfile>>> {
    let kids = kid::list_kids(state.db.pool(), session.parent_id()?).await?;
    Ok(Json(kids))
}

/// Add a child.
pub async fn create_api(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<ChildProfileInput>,
) -> Result<(StatusCode, Json<ChildProfile>)> {
    let parent_id = session.parent_id()?;
    validate_form(&input)?;

    let created = kid::create_kid(state.db.pool(), parent_id, &input).await?;
    info!(kid_id = %created.id, "Child profile added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit a child. Only the owning parent can.
pub async fn update_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(input): Json<ChildProfileInput>,
) -> Result<Json<ChildProfile>> {
    let parent_id = session.parent_id()?;
    validate_form(&input)?;

    let updated = kid::update_kid(state.db.pool(), &id, parent_id, &input).await?;
    Ok(Json(updated))
}

/// Delete a child. Their worksheets stay in the history.
pub async fn delete_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    kid::delete_kid(state.db.pool(), &id, session.parent_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
