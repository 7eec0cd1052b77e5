//! Child profile CRUD, always scoped to the owning parent.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::labels::{encode_list, normalize_labels};
use crate::models::{ChildProfile, ChildProfileInput, KidRow};
use crate::validation::{validate_child_name, validate_label};

const KID_COLUMNS: &str = "id, parent_id, name, age, grade, school_type, interests, \
    subjects, avatar, gender, created_at, updated_at";

/// Normalized column values shared by insert and update.
struct KidValues {
    name: String,
    interests: String,
    subjects: String,
}

fn prepare(input: &ChildProfileInput) -> Result<KidValues> {
    validate_child_name(&input.name)?;
    let interests = normalize_labels(&input.interests);
    for interest in &interests {
        validate_label("interest", interest)?;
    }

    Ok(KidValues {
        name: input.name.trim().to_string(),
        interests: encode_list(&interests),
        subjects: encode_list(&normalize_labels(&input.subjects)),
    })
}

/// List a parent's children in insertion order.
pub async fn list_kids(pool: &SqlitePool, parent_id: &str) -> Result<Vec<ChildProfile>> {
    let query = format!("SELECT {KID_COLUMNS} FROM kids WHERE parent_id = ? ORDER BY rowid");
    let rows = sqlx::query_as::<_, KidRow>(&query)
        .bind(parent_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(ChildProfile::from).collect())
}

/// Get one child, only if it belongs to `parent_id`.
pub async fn get_kid(pool: &SqlitePool, id: &str, parent_id: &str) -> Result<ChildProfile> {
    let query = format!("SELECT {KID_COLUMNS} FROM kids WHERE id = ? AND parent_id = ?");
    sqlx::query_as::<_, KidRow>(&query)
        .bind(id)
        .bind(parent_id)
        .fetch_optional(pool)
        .await?
        .map(ChildProfile::from)
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Child",
            id: id.to_string(),
        })
}

/// Create a child profile under `parent_id`.
///
/// Fails with `NotFound` if the parent does not exist.
pub async fn create_kid(
    pool: &SqlitePool,
    parent_id: &str,
    input: &ChildProfileInput,
) -> Result<ChildProfile> {
    let values = prepare(input)?;
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO kids (id, parent_id, name, age, grade, school_type, interests, subjects, avatar, gender)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(parent_id)
    .bind(&values.name)
    .bind(input.age)
    .bind(&input.grade)
    .bind(input.school_type.as_str())
    .bind(&values.interests)
    .bind(&values.subjects)
    .bind(&input.avatar)
    .bind(&input.gender)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Parent",
                    id: parent_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::info!(kid_id = %id, parent_id = %parent_id, "Created child profile");
    get_kid(pool, &id, parent_id).await
}

/// Update a child profile. The row must match both `id` and `parent_id`.
pub async fn update_kid(
    pool: &SqlitePool,
    id: &str,
    parent_id: &str,
    input: &ChildProfileInput,
) -> Result<ChildProfile> {
    let values = prepare(input)?;

    let result = sqlx::query(
        r#"
        UPDATE kids
        SET name = ?, age = ?, grade = ?, school_type = ?, interests = ?, subjects = ?,
            avatar = ?, gender = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(&values.name)
    .bind(input.age)
    .bind(&input.grade)
    .bind(input.school_type.as_str())
    .bind(&values.interests)
    .bind(&values.subjects)
    .bind(&input.avatar)
    .bind(&input.gender)
    .bind(id)
    .bind(parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Child",
            id: id.to_string(),
        });
    }

    get_kid(pool, id, parent_id).await
}

/// Delete a child profile. The row must match both `id` and `parent_id`.
///
/// Worksheets of the child are kept; their child reference is cleared.
pub async fn delete_kid(pool: &SqlitePool, id: &str, parent_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM kids
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(id)
    .bind(parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Child",
            id: id.to_string(),
        });
    }

    tracing::info!(kid_id = %id, parent_id = %parent_id, "Deleted child profile");
    Ok(())
}

/// Count a parent's children.
pub async fn count_kids(pool: &SqlitePool, parent_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kids WHERE parent_id = ?")
        .bind(parent_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
