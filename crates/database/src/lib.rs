//! SQLite persistence layer for Funsheets.
//!
//! This crate provides async database operations for parent accounts, child
//! profiles, generated worksheets and their reviews using SQLx with SQLite.
//! Every child and worksheet operation takes the owning parent's id and
//! filters on it.
//!
//! # Example
//!
//! ```no_run
//! use database::{kid, parent, ChildProfileInput, Database, Identity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:funsheets.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Resolve (or create) the parent for a signed-in identity
//!     let identity = Identity::new("auth|123", "parent@example.com");
//!     let parent = parent::resolve_parent(db.pool(), &identity).await?.into_profile();
//!
//!     // Add a child
//!     let input = ChildProfileInput {
//!         name: "Alex".to_string(),
//!         age: Some(8),
//!         interests: vec!["Space".to_string(), "Soccer".to_string()],
//!         ..Default::default()
//!     };
//!     kid::create_kid(db.pool(), &parent.id, &input).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kid;
pub mod labels;
pub mod models;
pub mod parent;
pub mod review;
pub mod validation;
pub mod worksheet;

pub use error::{DatabaseError, Result};
pub use models::{
    ChildProfile, ChildProfileInput, Difficulty, Identity, NewWorksheet, ParentProfile,
    ReviewInput, SchoolType, StatusPolicy, Subscription, WorksheetDetail, WorksheetReview,
    WorksheetStatus, WorksheetSummary,
};
pub use parent::ParentResolution;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/funsheets.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// In-memory databases are private to one connection, so use a pool size
    /// of 1 with `sqlite::memory:`.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    pub async fn seed_parent(db: &Database, auth_id: &str) -> ParentProfile {
        let identity = Identity::new(auth_id, format!("{auth_id}@example.com"));
        parent::resolve_parent(db.pool(), &identity)
            .await
            .unwrap()
            .into_profile()
    }

    pub fn alex() -> ChildProfileInput {
        ChildProfileInput {
            name: "Alex".to_string(),
            age: Some(8),
            grade: Some("3rd Grade".to_string()),
            school_type: SchoolType::Public,
            interests: vec!["Space".to_string(), "Soccer".to_string()],
            ..Default::default()
        }
    }

    pub fn new_worksheet(parent_id: &str, kid_id: &str) -> NewWorksheet {
        NewWorksheet {
            parent_id: parent_id.to_string(),
            kid_id: kid_id.to_string(),
            title: "Math Worksheet".to_string(),
            subject: "Math".to_string(),
            topic: None,
            difficulty: Difficulty::Hard,
            content: "1. What is 2 + 2?".to_string(),
            prompt: Some("math for Alex".to_string()),
            regenerated_from: None,
        }
    }
}
