//! Current user route.

use axum::extract::State;
use axum::Json;
use database::{parent, Identity, ParentProfile};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{ParentLink, Session};
use crate::state::AppState;

/// Who is signed in, and their parent profile when it could be loaded.
#[derive(Debug, Serialize)]
pub struct Me {
    pub identity: Identity,
    pub parent: Option<ParentProfile>,
    pub profile_error: Option<String>,
}

impl From<Session> for Me {
    fn from(session: Session) -> Self {
        let (parent, profile_error) = match session.parent {
            ParentLink::Linked(profile) => (Some(profile), None),
            ParentLink::Unavailable(reason) => (None, Some(reason)),
        };
        Self {
            identity: session.identity,
            parent,
            profile_error,
        }
    }
}

/// Always succeeds for a signed-in user, even when the profile is unavailable.
pub async fn me_api(session: Session) -> Json<Me> {
    Json(Me::from(session))
}

/// Editable parent profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    /// New display name; absent or blank clears it.
    pub name: Option<String>,
}

/// Update the signed-in parent's display name.
pub async fn update_api(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ParentProfile>> {
    let parent_id = session.parent_id()?;
    let profile =
        parent::update_parent_name(state.db.pool(), parent_id, update.name.as_deref()).await?;
    Ok(Json(profile))
}
