//! Worksheet generator routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::{kid, validation, worksheet, ChildProfile, Difficulty, NewWorksheet, ValidationError, WorksheetDetail};
use serde::Deserialize;
use tracing::{info, warn};
use worksheet_gen::{subject_name, GenerationRequest, Subject, SUBJECTS};

use crate::error::Result;
use crate::session::Session;
use crate::state::AppState;

const DEFAULT_LEVEL: u8 = 2;

/// Generator form as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateForm {
    pub child_id: Option<String>,
    /// Subject id from the catalog (e.g. `math`).
    pub subject: Option<String>,
    /// Slider value: 1 Easy, 2 Medium, 3 Hard.
    pub difficulty: Option<u8>,
    pub instructions: Option<String>,
}

fn required(value: Option<&str>, field: &str) -> std::result::Result<String, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::Missing(field.to_string()))
}

impl GenerateForm {
    fn difficulty(&self) -> std::result::Result<Difficulty, ValidationError> {
        let level = self.difficulty.unwrap_or(DEFAULT_LEVEL);
        Difficulty::from_level(level).ok_or(ValidationError::OutOfRange {
            field: "difficulty".to_string(),
            min: 1,
            max: 3,
            actual: i64::from(level),
        })
    }
}

/// List the subject catalog.
pub async fn subjects_api() -> Json<&'static [Subject]> {
    Json(SUBJECTS)
}

/// Generate a worksheet for one of the parent's children and store it as `New`.
pub async fn generate_api(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<GenerateForm>,
) -> Result<(StatusCode, Json<WorksheetDetail>)> {
    let parent_id = session.parent_id()?;
    let child_id = required(form.child_id.as_deref(), "child")?;
    let subject_id = required(form.subject.as_deref(), "subject")?;
    let difficulty = form.difficulty()?;

    let child = kid::get_kid(state.db.pool(), &child_id, parent_id).await?;
    let plan = WorksheetPlan {
        subject: subject_name(&subject_id).to_string(),
        difficulty,
        instructions: form.instructions,
        regenerated_from: None,
    };

    let created = generate_for_child(&state, parent_id, &child, plan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// What to generate, independent of who it is for.
pub(crate) struct WorksheetPlan {
    pub subject: String,
    pub difficulty: Difficulty,
    pub instructions: Option<String>,
    pub regenerated_from: Option<String>,
}

/// Run the generator and persist the result. Nothing is stored when
/// generation fails.
pub(crate) async fn generate_for_child(
    state: &AppState,
    parent_id: &str,
    child: &ChildProfile,
    plan: WorksheetPlan,
) -> Result<WorksheetDetail> {
    let instructions = plan
        .instructions
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty());
    if let Some(text) = &instructions {
        validation::validate_instructions(text)?;
    }

    let request = GenerationRequest {
        child_name: child.name.clone(),
        interests: child.interests.clone(),
        subject: plan.subject.clone(),
        difficulty: plan.difficulty,
        instructions: instructions.clone(),
    };

    let generated = state.generator.generate(request).await.map_err(|err| {
        warn!(
            generator = state.generator.name(),
            kid_id = %child.id,
            error = %err,
            "Worksheet generation failed"
        );
        err
    })?;

    let new = NewWorksheet {
        parent_id: parent_id.to_string(),
        kid_id: child.id.clone(),
        title: generated.title,
        subject: plan.subject,
        topic: instructions,
        difficulty: plan.difficulty,
        content: generated.content,
        prompt: Some(generated.prompt),
        regenerated_from: plan.regenerated_from,
    };

    let created = worksheet::create_worksheet(state.db.pool(), &new).await?;
    info!(
        worksheet_id = %created.summary.id,
        kid_id = %child.id,
        subject = %created.summary.subject,
        "Worksheet generated"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebError;
    use crate::test_support::{add_child, sign_in, test_state, test_state_with, FailingGenerator};
    use database::{DatabaseError, WorksheetStatus};

    fn form(child_id: &str, subject: &str) -> GenerateForm {
        GenerateForm {
            child_id: Some(child_id.to_string()),
            subject: Some(subject.to_string()),
            difficulty: Some(3),
            instructions: Some("  Use fractions ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_subjects_catalog() {
        let Json(subjects) = subjects_api().await;
        assert_eq!(subjects.len(), 5);
        assert_eq!(subjects[0].id, "math");
    }

    #[tokio::test]
    async fn test_generate_stores_new_worksheet() {
        let state = test_state().await;
        let session = sign_in(&state, "parent-a").await;
        let child = add_child(&state, &session, "Alex").await;

        let (status, Json(ws)) = generate_api(
            State(state.clone()),
            session.clone(),
            Json(form(&child.id, "math")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ws.summary.title, "Math Worksheet");
        assert_eq!(ws.summary.subject, "Math");
        assert_eq!(ws.summary.difficulty, Difficulty::Hard);
        assert_eq!(ws.summary.status, WorksheetStatus::New);
        assert_eq!(ws.summary.child_name, "Alex");
        assert_eq!(ws.topic.as_deref(), Some("Use fractions"));
        assert!(ws.content.contains("Custom question: Use fractions"));
        assert!(ws.content.contains("Question one about Space"));
    }

    #[tokio::test]
    async fn test_missing_selection_makes_no_call() {
        let state = test_state_with(std::sync::Arc::new(FailingGenerator)).await;
        let session = sign_in(&state, "parent-a").await;

        let mut no_child = form("", "math");
        no_child.child_id = None;
        let result = generate_api(State(state.clone()), session.clone(), Json(no_child)).await;
        // Validation fails before the failing generator is reached.
        assert!(matches!(
            result,
            Err(WebError::Validation(ValidationError::Missing(ref f))) if f == "child"
        ));

        let result = generate_api(State(state), session, Json(form("k1", " "))).await;
        assert!(matches!(
            result,
            Err(WebError::Validation(ValidationError::Missing(ref f))) if f == "subject"
        ));
    }

    #[tokio::test]
    async fn test_generation_failure_persists_nothing() {
        let state = test_state_with(std::sync::Arc::new(FailingGenerator)).await;
        let session = sign_in(&state, "parent-a").await;
        let child = add_child(&state, &session, "Alex").await;

        let result = generate_api(
            State(state.clone()),
            session.clone(),
            Json(form(&child.id, "science")),
        )
        .await;
        assert!(matches!(result, Err(WebError::Generation(_))));

        let count = worksheet::count_worksheets(state.db.pool(), session.parent_id().unwrap())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_cannot_generate_for_other_parents_child() {
        let state = test_state().await;
        let owner = sign_in(&state, "parent-a").await;
        let other = sign_in(&state, "parent-b").await;
        let child = add_child(&state, &owner, "Alex").await;

        let result = generate_api(State(state), other, Json(form(&child.id, "math"))).await;
        assert!(matches!(
            result,
            Err(WebError::Database(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_overlong_instructions_rejected_before_generation() {
        let state = test_state_with(std::sync::Arc::new(FailingGenerator)).await;
        let session = sign_in(&state, "parent-a").await;
        let child = add_child(&state, &session, "Alex").await;

        let mut long = form(&child.id, "math");
        long.instructions = Some("x".repeat(2001));
        let result = generate_api(State(state.clone()), session.clone(), Json(long)).await;
        assert!(matches!(
            result,
            Err(WebError::Validation(ValidationError::TooLong {
                ref field,
                max: 2000,
                actual: 2001,
            })) if field == "instructions"
        ));

        let count = worksheet::count_worksheets(state.db.pool(), session.parent_id().unwrap())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_bad_difficulty_level() {
        let state = test_state().await;
        let session = sign_in(&state, "parent-a").await;
        let child = add_child(&state, &session, "Alex").await;

        let mut bad = form(&child.id, "math");
        bad.difficulty = Some(7);
        let result = generate_api(State(state), session, Json(bad)).await;
        assert!(matches!(
            result,
            Err(WebError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }
}
