//! Template generator - fills a fixed worksheet layout.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::request::{GeneratedWorksheet, GenerationRequest};
use crate::trait_def::WorksheetGenerator;

const FALLBACK_TOPIC: &str = "general topics";

/// A generator that writes a five-question worksheet from a fixed template.
///
/// It stands in for a model-backed generator: the questions are placeholders
/// themed on the child's first interest and the chosen subject.
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    fn render(request: &GenerationRequest) -> String {
        let subject = request.subject.trim();
        let child = request.child_name.trim();
        let topic = request.lead_interest().unwrap_or(FALLBACK_TOPIC);
        let custom = match request.instructions() {
            Some(instructions) => format!("Custom question: {}", instructions),
            None => "Additional practice question".to_string(),
        };

        format!(
            "# {subject} Worksheet for {child}\n\
             \n\
             ## {difficulty} Level\n\
             \n\
             1. Question one about {topic}\n\
             2. Question two about {subject}\n\
             3. Question three combining {subject} with {topic}\n\
             4. {custom}\n\
             5. Bonus challenge question\n\
             \n\
             Good luck, {child}!\n",
            difficulty = request.difficulty,
        )
    }
}

#[async_trait]
impl WorksheetGenerator for TemplateGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedWorksheet, GenerationError> {
        if request.child_name.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("child name is empty".to_string()));
        }
        if request.subject.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("subject is empty".to_string()));
        }

        tracing::debug!(
            subject = %request.subject.trim(),
            difficulty = %request.difficulty,
            "Rendering template worksheet"
        );

        Ok(GeneratedWorksheet {
            title: format!("{} Worksheet", request.subject.trim()),
            content: Self::render(&request),
            prompt: request.prompt(),
        })
    }

    fn name(&self) -> &str {
        "TemplateGenerator"
    }
}
