//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub generator: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let status = if state.generator.is_ready().await { "ok" } else { "degraded" };
    Json(Health {
        status: status.to_string(),
        generator: state.generator.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health(State(test_state().await)).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.generator, "TemplateGenerator");
    }
}
