//! Generation request and result types.

use database::Difficulty;
use serde::{Deserialize, Serialize};

/// Everything a generator needs to write one worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub child_name: String,
    /// The child's interests, most important first.
    pub interests: Vec<String>,
    /// Subject display name (e.g. "Math").
    pub subject: String,
    pub difficulty: Difficulty,
    /// Free-text instructions from the parent.
    pub instructions: Option<String>,
}

impl GenerationRequest {
    /// The interest the worksheet is themed around, if any.
    pub fn lead_interest(&self) -> Option<&str> {
        self.interests
            .iter()
            .map(|i| i.trim())
            .find(|i| !i.is_empty())
    }

    /// Instructions with surrounding whitespace removed; `None` when blank.
    pub fn instructions(&self) -> Option<&str> {
        self.instructions
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
    }

    /// A compact description of the request, stored alongside the worksheet.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "{} worksheet for {} at {} difficulty",
            self.subject, self.child_name, self.difficulty
        );
        if !self.interests.is_empty() {
            prompt.push_str(&format!("; interests: {}", self.interests.join(", ")));
        }
        if let Some(instructions) = self.instructions() {
            prompt.push_str(&format!("; instructions: {}", instructions));
        }
        prompt
    }
}

/// A generated worksheet, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedWorksheet {
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub prompt: String,
}
