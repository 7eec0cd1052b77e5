//! Worksheet review routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{review, worksheet, ReviewInput, WorksheetReview};

use crate::error::{Result, WebError};
use crate::session::Session;
use crate::state::AppState;

/// The review of a worksheet, or `null` if none was submitted yet.
pub async fn get_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Option<WorksheetReview>>> {
    let parent_id = session.parent_id()?;
    if worksheet::get_worksheet(state.db.pool(), &id, parent_id)
        .await?
        .is_none()
    {
        return Err(WebError::NotFound("Worksheet".to_string()));
    }

    Ok(Json(review::get_review(state.db.pool(), &id).await?))
}

/// Submit or edit the review. The worksheet's rating follows it.
pub async fn put_api(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<WorksheetReview>> {
    let saved = review::upsert_review(state.db.pool(), &id, session.parent_id()?, &input).await?;
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_child, generate, sign_in, test_state};
    use database::{DatabaseError, ValidationError};

    fn input(rating: i64, feedback: &str) -> ReviewInput {
        ReviewInput {
            rating,
            feedback: Some(feedback.to_string()),
            student_reactions: vec!["😃".to_string(), "😃".to_string(), "😕".to_string()],
        }
    }

    #[tokio::test]
    async fn test_review_round_trip_and_edit() {
        let state = test_state().await;
        let session = sign_in(&state, "parent-a").await;
        let alex = add_child(&state, &session, "Alex").await;
        let ws = generate(&state, &session, &alex.id, "math").await;
        let id = ws.summary.id.clone();

        let Json(none) = get_api(State(state.clone()), session.clone(), Path(id.clone()))
            .await
            .unwrap();
        assert!(none.is_none());

        let Json(first) = put_api(
            State(state.clone()),
            session.clone(),
            Path(id.clone()),
            Json(input(4, "  Loved it ")),
        )
        .await
        .unwrap();
        assert_eq!(first.feedback.as_deref(), Some("Loved it"));
        assert_eq!(first.student_reactions, vec!["😃", "😕"]);

        let Json(second) = put_api(
            State(state.clone()),
            session.clone(),
            Path(id.clone()),
            Json(input(2, "   ")),
        )
        .await
        .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.rating, 2);
        assert_eq!(second.feedback, None);

        let Json(fetched) = get_api(State(state.clone()), session.clone(), Path(id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, Some(second));

        let detail = worksheet::get_worksheet(state.db.pool(), &id, session.parent_id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.summary.rating, Some(2));
    }

    #[tokio::test]
    async fn test_rating_out_of_range() {
        let state = test_state().await;
        let session = sign_in(&state, "parent-a").await;
        let alex = add_child(&state, &session, "Alex").await;
        let ws = generate(&state, &session, &alex.id, "math").await;

        let result = put_api(State(state), session, Path(ws.summary.id), Json(input(6, "x"))).await;
        assert!(matches!(
            result,
            Err(WebError::Database(DatabaseError::Invalid(
                ValidationError::OutOfRange { .. }
            )))
        ));
    }

    #[tokio::test]
    async fn test_other_parent_cannot_review() {
        let state = test_state().await;
        let owner = sign_in(&state, "parent-a").await;
        let other = sign_in(&state, "parent-b").await;
        let alex = add_child(&state, &owner, "Alex").await;
        let ws = generate(&state, &owner, &alex.id, "math").await;

        let read = get_api(State(state.clone()), other.clone(), Path(ws.summary.id.clone())).await;
        assert!(matches!(read, Err(WebError::NotFound(_))));

        let write = put_api(State(state), other, Path(ws.summary.id), Json(input(5, "x"))).await;
        assert!(matches!(
            write,
            Err(WebError::Database(DatabaseError::NotFound { .. }))
        ));
    }
}
