//! The WorksheetGenerator trait definition.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::request::{GeneratedWorksheet, GenerationRequest};

/// A trait for turning a generation request into worksheet content.
///
/// Implementations range from the built-in template to a model-backed
/// service. This trait is object-safe and can be used with
/// `Arc<dyn WorksheetGenerator>`.
#[async_trait]
pub trait WorksheetGenerator: Send + Sync {
    /// Generate one worksheet.
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedWorksheet, GenerationError>;

    /// Get a human-readable name for this generator.
    fn name(&self) -> &str;

    /// Check if the generator is ready to accept requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
