//! Worksheet content generation for Funsheets.
//!
//! This crate defines the `WorksheetGenerator` trait and the generators that
//! ship with the service:
//! - `TemplateGenerator` - fills a fixed five-question layout
//! - `DelayedGenerator` - wraps another generator with artificial delay
//!
//! # Example
//!
//! ```rust
//! use worksheet_gen::{GenerationRequest, TemplateGenerator, WorksheetGenerator};
//! use database::Difficulty;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), worksheet_gen::GenerationError> {
//!     let generator = TemplateGenerator::new();
//!
//!     let request = GenerationRequest {
//!         child_name: "Alex".to_string(),
//!         interests: vec!["Space".to_string()],
//!         subject: "Math".to_string(),
//!         difficulty: Difficulty::Medium,
//!         instructions: None,
//!     };
//!
//!     let worksheet = generator.generate(request).await?;
//!     println!("{}", worksheet.content);
//!     Ok(())
//! }
//! ```

mod delayed;
mod error;
mod request;
pub mod subject;
mod template;
mod trait_def;

pub use async_trait::async_trait;
pub use delayed::DelayedGenerator;
pub use error::GenerationError;
pub use request::{GeneratedWorksheet, GenerationRequest};
pub use subject::{find_subject, subject_name, Subject, SUBJECTS};
pub use template::TemplateGenerator;
pub use trait_def::WorksheetGenerator;
