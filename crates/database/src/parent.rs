//! Parent account resolution and updates.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
#[cfg(test)]
use crate::models::Subscription;
use crate::models::{Identity, ParentProfile};
use crate::validation::{validate_auth_id, validate_child_name};

const PARENT_COLUMNS: &str = "id, auth_id, email, name, stripe_customer_id, \
    stripe_subscription_id, subscription_status, created_at, updated_at";

/// Outcome of resolving an identity to its parent account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentResolution {
    /// The account already existed.
    Found(ParentProfile),
    /// This call created the account.
    Created(ParentProfile),
}

impl ParentResolution {
    pub fn profile(&self) -> &ParentProfile {
        match self {
            ParentResolution::Found(p) | ParentResolution::Created(p) => p,
        }
    }

    pub fn into_profile(self) -> ParentProfile {
        match self {
            ParentResolution::Found(p) | ParentResolution::Created(p) => p,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, ParentResolution::Created(_))
    }
}

/// Get the parent account linked to an external auth id.
///
/// Returns `Ok(None)` when no account exists yet.
pub async fn get_parent_by_auth_id(
    pool: &SqlitePool,
    auth_id: &str,
) -> Result<Option<ParentProfile>> {
    let query = format!("SELECT {PARENT_COLUMNS} FROM parents WHERE auth_id = ?");
    let parent = sqlx::query_as::<_, ParentProfile>(&query)
        .bind(auth_id)
        .fetch_optional(pool)
        .await?;

    Ok(parent)
}

/// Get a parent account by its id.
pub async fn get_parent(pool: &SqlitePool, id: &str) -> Result<ParentProfile> {
    let query = format!("SELECT {PARENT_COLUMNS} FROM parents WHERE id = ?");
    sqlx::query_as::<_, ParentProfile>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Parent",
            id: id.to_string(),
        })
}

/// Return the parent account for `identity`, creating it on first use.
///
/// The insert is conditional on the unique auth id, so concurrent first
/// logins for the same identity end up sharing one row.
pub async fn resolve_parent(pool: &SqlitePool, identity: &Identity) -> Result<ParentResolution> {
    validate_auth_id(&identity.auth_id)?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO parents (id, auth_id, email)
        VALUES (?, ?, ?)
        ON CONFLICT(auth_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&identity.auth_id)
    .bind(identity.email.trim())
    .execute(pool)
    .await?
    .rows_affected()
        > 0;

    let parent = get_parent_by_auth_id(pool, &identity.auth_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Parent",
            id: identity.auth_id.clone(),
        })?;

    if inserted {
        tracing::info!(parent_id = %parent.id, "Created parent profile");
        Ok(ParentResolution::Created(parent))
    } else {
        Ok(ParentResolution::Found(parent))
    }
}

/// Set or clear a parent's display name. Blank clears it.
pub async fn update_parent_name(
    pool: &SqlitePool,
    parent_id: &str,
    name: Option<&str>,
) -> Result<ParentProfile> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = name {
        validate_child_name(name)?;
    }
    let result = sqlx::query(
        r#"
        UPDATE parents
        SET name = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Parent",
            id: parent_id.to_string(),
        });
    }

    get_parent(pool, parent_id).await
}

/// Overwrite the billing passthrough fields. The payment integration that
/// writes them lives outside this service.
#[cfg(test)]
pub(crate) async fn update_subscription(
    pool: &SqlitePool,
    parent_id: &str,
    subscription: &Subscription,
) -> Result<ParentProfile> {
    let result = sqlx::query(
        r#"
        UPDATE parents
        SET stripe_customer_id = ?,
            stripe_subscription_id = ?,
            subscription_status = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&subscription.stripe_customer_id)
    .bind(&subscription.stripe_subscription_id)
    .bind(&subscription.subscription_status)
    .bind(parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Parent",
            id: parent_id.to_string(),
        });
    }

    get_parent(pool, parent_id).await
}

#[cfg(test)]
pub(crate) async fn count_parents(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parents")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
