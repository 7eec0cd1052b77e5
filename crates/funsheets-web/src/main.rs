//! Parent-facing web service for Funsheets.
//!
//! Serves the dashboard, worksheet history and review pages, plus the JSON
//! API the client uses to manage children and worksheets.

mod config;
mod error;
mod routes;
mod session;
mod state;

use std::sync::Arc;

use database::Database;
use tower_http::services::ServeDir;
use tracing::info;
use worksheet_gen::{DelayedGenerator, TemplateGenerator, WorksheetGenerator};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Funsheets web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let generator: Arc<dyn WorksheetGenerator> = if config.generation_delay_ms > 0 {
        Arc::new(DelayedGenerator::with_millis(
            TemplateGenerator::new(),
            config.generation_delay_ms,
        ))
    } else {
        Arc::new(TemplateGenerator::new())
    };
    info!(
        generator = generator.name(),
        status_policy = ?config.status_policy,
        "Worksheet generator ready"
    );

    // Build application state
    let state = AppState::new(db, generator, config.status_policy, config.auth);

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Funsheets web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use database::{kid, ChildProfile, ChildProfileInput, Database, Identity, StatusPolicy, WorksheetDetail};
    use worksheet_gen::{
        async_trait, GeneratedWorksheet, GenerationError, GenerationRequest, TemplateGenerator,
        WorksheetGenerator,
    };

    use crate::config::AuthHeaders;
    use crate::routes::generator::{generate_api, GenerateForm};
    use crate::session::Session;
    use crate::state::AppState;

    /// A generator that always fails.
    pub struct FailingGenerator;

    #[async_trait]
    impl WorksheetGenerator for FailingGenerator {
        async fn generate(&self, _request: GenerationRequest) -> Result<GeneratedWorksheet, GenerationError> {
            Err(GenerationError::Unavailable("offline".to_string()))
        }

        fn name(&self) -> &str {
            "FailingGenerator"
        }
    }

    pub fn state_for(db: Database) -> AppState {
        AppState::new(
            db,
            Arc::new(TemplateGenerator::new()),
            StatusPolicy::ForwardOnly,
            AuthHeaders::default(),
        )
    }

    pub async fn test_state_with(generator: Arc<dyn WorksheetGenerator>) -> AppState {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        AppState::new(db, generator, StatusPolicy::ForwardOnly, AuthHeaders::default())
    }

    pub async fn test_state() -> AppState {
        test_state_with(Arc::new(TemplateGenerator::new())).await
    }

    pub async fn sign_in(state: &AppState, auth_id: &str) -> Session {
        let identity = Identity::new(auth_id, format!("{auth_id}@example.com"));
        let session = Session::establish(&state.db, identity).await;
        assert!(session.parent().is_ok());
        session
    }

    pub fn alex_input() -> ChildProfileInput {
        ChildProfileInput {
            name: "Alex".to_string(),
            age: Some(8),
            grade: Some("3rd Grade".to_string()),
            interests: vec!["Space".to_string(), "Soccer".to_string()],
            ..Default::default()
        }
    }

    pub async fn add_child(state: &AppState, session: &Session, name: &str) -> ChildProfile {
        let input = ChildProfileInput {
            name: name.to_string(),
            ..alex_input()
        };
        kid::create_kid(state.db.pool(), session.parent_id().unwrap(), &input)
            .await
            .unwrap()
    }

    pub async fn generate(
        state: &AppState,
        session: &Session,
        child_id: &str,
        subject: &str,
    ) -> WorksheetDetail {
        let form = GenerateForm {
            child_id: Some(child_id.to_string()),
            subject: Some(subject.to_string()),
            difficulty: Some(1),
            instructions: None,
        };
        let (_, axum::Json(created)) = generate_api(
            axum::extract::State(state.clone()),
            session.clone(),
            axum::Json(form),
        )
        .await
        .unwrap();
        created
    }
}
