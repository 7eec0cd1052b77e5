//! Error types for worksheet generation.

use thiserror::Error;

/// Errors that can occur while generating a worksheet.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator is temporarily unavailable.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The request was missing something the generator needs.
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    /// Generation ran but did not produce a worksheet.
    #[error("generation failed: {0}")]
    Failed(String),
}
