//! Subjects offered on the generator form.

use serde::Serialize;

/// A selectable worksheet subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    /// Form value.
    pub id: &'static str,
    /// Display name, stored on the worksheet.
    pub name: &'static str,
    pub icon: &'static str,
}

/// Subject name used when an id is not in the catalog.
pub const GENERAL_SUBJECT: &str = "General";

/// All subjects, in form order.
pub const SUBJECTS: &[Subject] = &[
    Subject { id: "math", name: "Math", icon: "📊" },
    Subject { id: "science", name: "Science", icon: "🔬" },
    Subject { id: "english", name: "English/Language Arts", icon: "📝" },
    Subject { id: "logic", name: "Logic & Reasoning", icon: "🧩" },
    Subject { id: "finance", name: "Financial Literacy", icon: "💰" },
];

/// Look up a subject by its form id.
pub fn find_subject(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

/// Display name for a subject id, "General" when unknown.
pub fn subject_name(id: &str) -> &'static str {
    find_subject(id).map(|s| s.name).unwrap_or(GENERAL_SUBJECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_lookup() {
        assert_eq!(subject_name("math"), "Math");
        assert_eq!(subject_name("english"), "English/Language Arts");
        assert_eq!(subject_name("astrology"), "General");
        assert!(find_subject("logic").is_some());
        assert_eq!(SUBJECTS.len(), 5);
    }
}
