//! Delayed generator - wraps another generator with artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;

use crate::error::GenerationError;
use crate::request::{GeneratedWorksheet, GenerationRequest};
use crate::trait_def::WorksheetGenerator;

/// A generator that waits before delegating to another generator.
///
/// Useful for exercising loading states against the template generator.
pub struct DelayedGenerator<G: WorksheetGenerator> {
    inner: G,
    delay: Duration,
}

impl<G: WorksheetGenerator> DelayedGenerator<G> {
    /// Wrap `inner` with the given delay.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Wrap `inner` with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: WorksheetGenerator> WorksheetGenerator for DelayedGenerator<G> {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedWorksheet, GenerationError> {
        debug!(
            inner = self.inner.name(),
            delay_ms = self.delay.as_millis() as u64,
            "Delaying worksheet generation"
        );
        sleep(self.delay).await;
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateGenerator;
    use database::Difficulty;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_generator() {
        let generator = DelayedGenerator::with_millis(TemplateGenerator::new(), 50);
        let request = GenerationRequest {
            child_name: "Sophia".to_string(),
            interests: vec!["Art".to_string()],
            subject: "Science".to_string(),
            difficulty: Difficulty::Medium,
            instructions: None,
        };

        let start = Instant::now();
        let ws = generator.generate(request).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(ws.title, "Science Worksheet");
    }

    #[tokio::test]
    async fn test_generator_name_and_readiness() {
        let generator = DelayedGenerator::with_millis(TemplateGenerator::new(), 0);
        assert_eq!(generator.name(), "DelayedGenerator");
        assert!(generator.is_ready().await);
    }
}
