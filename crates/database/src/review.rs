//! Worksheet reviews.
//!
//! A worksheet has at most one review. Submitting again edits it in place,
//! and the worksheet's own `rating` column mirrors the latest review rating.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::labels::encode_reactions;
use crate::models::{ReviewInput, ReviewRow, WorksheetReview};
use crate::validation::{validate_feedback, validate_label, validate_rating};

const REVIEW_COLUMNS: &str =
    "id, worksheet_id, rating, feedback, student_feedback, created_at, updated_at";

/// Get the review of a worksheet, if one was submitted.
pub async fn get_review(pool: &SqlitePool, worksheet_id: &str) -> Result<Option<WorksheetReview>> {
    let query = format!("SELECT {REVIEW_COLUMNS} FROM worksheet_reviews WHERE worksheet_id = ?");
    let row = sqlx::query_as::<_, ReviewRow>(&query)
        .bind(worksheet_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(WorksheetReview::from))
}

/// Create or update the review of a worksheet owned by `parent_id`.
///
/// The review write and the rating mirror on the worksheet commit together.
pub async fn upsert_review(
    pool: &SqlitePool,
    worksheet_id: &str,
    parent_id: &str,
    input: &ReviewInput,
) -> Result<WorksheetReview> {
    validate_rating(input.rating)?;
    let feedback = input
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    if let Some(feedback) = feedback {
        validate_feedback(feedback)?;
    }
    for reaction in &input.student_reactions {
        validate_label("reaction", reaction.trim())?;
    }
    let reactions = encode_reactions(&input.student_reactions);

    let mut tx = pool.begin().await?;

    // Mirror first: it doubles as the ownership check.
    let mirrored = sqlx::query(
        r#"
        UPDATE worksheets
        SET rating = ?
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(input.rating)
    .bind(worksheet_id)
    .bind(parent_id)
    .execute(&mut *tx)
    .await?;

    if mirrored.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Worksheet",
            id: worksheet_id.to_string(),
        });
    }

    sqlx::query(
        r#"
        INSERT INTO worksheet_reviews (id, worksheet_id, rating, feedback, student_feedback)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(worksheet_id) DO UPDATE SET
            rating = excluded.rating,
            feedback = excluded.feedback,
            student_feedback = excluded.student_feedback,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(worksheet_id)
    .bind(input.rating)
    .bind(feedback)
    .bind(&reactions)
    .execute(&mut *tx)
    .await?;

    let query = format!("SELECT {REVIEW_COLUMNS} FROM worksheet_reviews WHERE worksheet_id = ?");
    let review = sqlx::query_as::<_, ReviewRow>(&query)
        .bind(worksheet_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(worksheet_id = %worksheet_id, rating = input.rating, "Saved worksheet review");
    Ok(review.into())
}

/// Count stored reviews of a worksheet (0 or 1).
pub async fn count_reviews(pool: &SqlitePool, worksheet_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM worksheet_reviews WHERE worksheet_id = ?",
    )
    .bind(worksheet_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
