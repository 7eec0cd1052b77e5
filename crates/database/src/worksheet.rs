//! Worksheet storage and status transitions.
//!
//! Reads are scoped to the owning parent and never return nulls for the
//! display fields; see [`WorksheetSummary`].

use std::future::Future;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{
    NewWorksheet, StatusPolicy, WorksheetDetail, WorksheetRow, WorksheetStatus, WorksheetSummary,
};

/// Attempts at the conditional status write before giving up.
const STATUS_WRITE_ATTEMPTS: usize = 3;

const WORKSHEET_SELECT: &str = r#"
    SELECT w.id, w.kid_id, k.name AS child_name, w.title, w.subject, w.topic,
           w.difficulty, w.status, w.rating, w.content, w.prompt,
           w.regenerated_from, w.created_at
    FROM worksheets w
    LEFT JOIN kids k ON k.id = w.kid_id
"#;

/// Store a freshly generated worksheet with status `New`.
pub async fn create_worksheet(pool: &SqlitePool, worksheet: &NewWorksheet) -> Result<WorksheetDetail> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO worksheets
            (id, kid_id, parent_id, title, subject, topic, difficulty, status, content, prompt, regenerated_from)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&worksheet.kid_id)
    .bind(&worksheet.parent_id)
    .bind(&worksheet.title)
    .bind(&worksheet.subject)
    .bind(&worksheet.topic)
    .bind(worksheet.difficulty.as_str())
    .bind(WorksheetStatus::New.as_str())
    .bind(&worksheet.content)
    .bind(&worksheet.prompt)
    .bind(&worksheet.regenerated_from)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Child",
                    id: worksheet.kid_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::info!(
        worksheet_id = %id,
        kid_id = %worksheet.kid_id,
        regenerated_from = ?worksheet.regenerated_from,
        "Stored worksheet"
    );

    get_worksheet(pool, &id, &worksheet.parent_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Worksheet",
            id: id.clone(),
        })
}

/// List a parent's worksheets, newest first.
pub async fn list_worksheets(pool: &SqlitePool, parent_id: &str) -> Result<Vec<WorksheetSummary>> {
    let query = format!(
        "{WORKSHEET_SELECT} WHERE w.parent_id = ? ORDER BY w.created_at DESC, w.rowid DESC"
    );
    let rows = sqlx::query_as::<_, WorksheetRow>(&query)
        .bind(parent_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(WorksheetSummary::from).collect())
}

/// List the most recent worksheets of one child.
pub async fn list_for_kid(
    pool: &SqlitePool,
    kid_id: &str,
    parent_id: &str,
    limit: i64,
) -> Result<Vec<WorksheetSummary>> {
    let query = format!(
        "{WORKSHEET_SELECT} WHERE w.kid_id = ? AND w.parent_id = ? \
         ORDER BY w.created_at DESC, w.rowid DESC LIMIT ?"
    );
    let rows = sqlx::query_as::<_, WorksheetRow>(&query)
        .bind(kid_id)
        .bind(parent_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(WorksheetSummary::from).collect())
}

/// Get a worksheet with its content.
///
/// Returns `Ok(None)` when no worksheet with this id belongs to the parent.
pub async fn get_worksheet(
    pool: &SqlitePool,
    id: &str,
    parent_id: &str,
) -> Result<Option<WorksheetDetail>> {
    let query = format!("{WORKSHEET_SELECT} WHERE w.id = ? AND w.parent_id = ?");
    let row = sqlx::query_as::<_, WorksheetRow>(&query)
        .bind(id)
        .bind(parent_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(WorksheetDetail::from))
}

/// Count a parent's worksheets.
pub async fn count_worksheets(pool: &SqlitePool, parent_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM worksheets WHERE parent_id = ?")
        .bind(parent_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

async fn current_status(pool: &SqlitePool, id: &str, parent_id: &str) -> Result<Option<String>> {
    let status = sqlx::query_scalar::<_, Option<String>>(
        "SELECT status FROM worksheets WHERE id = ? AND parent_id = ?",
    )
    .bind(id)
    .bind(parent_id)
    .fetch_optional(pool)
    .await?;

    match status {
        Some(stored) => Ok(Some(stored.unwrap_or_default())),
        None => Ok(None),
    }
}

/// Move a worksheet to `next`, subject to `policy`.
///
/// Returns the status the worksheet had before the call. Setting the current
/// status again succeeds without writing. The write only lands if the stored
/// status is still the one that was validated.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    parent_id: &str,
    next: WorksheetStatus,
    policy: StatusPolicy,
) -> Result<WorksheetStatus> {
    update_status_with(pool, id, parent_id, next, policy, || async {}).await
}

/// [`update_status`] with a hook that runs between reading the stored status
/// and the conditional write.
async fn update_status_with<F, Fut>(
    pool: &SqlitePool,
    id: &str,
    parent_id: &str,
    next: WorksheetStatus,
    policy: StatusPolicy,
    mut before_write: F,
) -> Result<WorksheetStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    for _ in 0..STATUS_WRITE_ATTEMPTS {
        let stored = current_status(pool, id, parent_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Worksheet",
                id: id.to_string(),
            })?;
        let current = WorksheetStatus::from_stored(Some(&stored));

        if current == next && stored == next.as_str() {
            return Ok(current);
        }

        if !current.can_move_to(next, policy) {
            return Err(DatabaseError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        before_write().await;

        let result = sqlx::query(
            r#"
            UPDATE worksheets
            SET status = ?
            WHERE id = ? AND parent_id = ? AND COALESCE(status, '') = ?
            "#,
        )
        .bind(next.as_str())
        .bind(id)
        .bind(parent_id)
        .bind(&stored)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(worksheet_id = %id, from = %current, to = %next, "Worksheet status changed");
            return Ok(current);
        }
    }

    tracing::warn!(worksheet_id = %id, "Gave up on contended status write");
    Err(DatabaseError::Conflict {
        entity: "Worksheet",
        id: id.to_string(),
    })
}
