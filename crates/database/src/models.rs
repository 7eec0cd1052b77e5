//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::ValidationError;

/// Title shown for worksheets stored without one.
pub const DEFAULT_TITLE: &str = "Untitled Worksheet";

/// Subject shown for worksheets stored without one.
pub const DEFAULT_SUBJECT: &str = "General";

/// Child name shown when the owning child no longer exists.
pub const UNKNOWN_CHILD: &str = "Unknown";

/// The authenticated identity handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable external identifier (the provider's user id).
    pub auth_id: String,
    /// Email address reported by the provider; may be empty.
    pub email: String,
}

impl Identity {
    pub fn new(auth_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            email: email.into(),
        }
    }
}

/// A parent account, one per external identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParentProfile {
    pub id: String,
    /// External auth identifier (unique).
    pub auth_id: String,
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Billing passthrough, never interpreted here.
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Opaque billing fields written through from the payment integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: Option<String>,
}

/// Type of school a child attends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolType {
    #[default]
    Public,
    Private,
    Charter,
    Magnet,
    Homeschool,
}

impl SchoolType {
    pub const ALL: [SchoolType; 5] = [
        SchoolType::Public,
        SchoolType::Private,
        SchoolType::Charter,
        SchoolType::Magnet,
        SchoolType::Homeschool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolType::Public => "Public",
            SchoolType::Private => "Private",
            SchoolType::Charter => "Charter",
            SchoolType::Magnet => "Magnet",
            SchoolType::Homeschool => "Homeschool",
        }
    }
}

/// Worksheet difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Map the generator form's 1–3 slider value.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Worksheet lifecycle status: `New → Downloaded → Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorksheetStatus {
    #[default]
    New,
    Downloaded,
    Completed,
}

impl WorksheetStatus {
    pub const ALL: [WorksheetStatus; 3] = [
        WorksheetStatus::New,
        WorksheetStatus::Downloaded,
        WorksheetStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorksheetStatus::New => "New",
            WorksheetStatus::Downloaded => "Downloaded",
            WorksheetStatus::Completed => "Completed",
        }
    }

    /// Whether moving from `self` to `next` is allowed under `policy`.
    ///
    /// Staying in place is always allowed.
    pub fn can_move_to(self, next: WorksheetStatus, policy: StatusPolicy) -> bool {
        match policy {
            StatusPolicy::Permissive => true,
            StatusPolicy::ForwardOnly => next >= self,
        }
    }
}

/// How backward status moves (e.g. `Completed → New`) are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusPolicy {
    /// Reject any move to an earlier status.
    #[default]
    ForwardOnly,
    /// Allow any move.
    Permissive,
}

impl FromStr for StatusPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward-only" | "forward_only" | "forward" => Ok(StatusPolicy::ForwardOnly),
            "permissive" | "any" => Ok(StatusPolicy::Permissive),
            _ => Err(unknown("status policy", s)),
        }
    }
}

macro_rules! text_enum {
    ($ty:ident, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| unknown($field, s))
            }
        }

        impl $ty {
            /// Parse stored text, falling back to the default for absent or
            /// unrecognized values.
            pub fn from_stored(raw: Option<&str>) -> Self {
                raw.and_then(|s| s.parse().ok()).unwrap_or_default()
            }
        }
    };
}

text_enum!(SchoolType, "school type");
text_enum!(Difficulty, "difficulty");
text_enum!(WorksheetStatus, "status");

fn unknown(field: &str, value: &str) -> ValidationError {
    ValidationError::UnknownValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// A child profile owned by a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub age: Option<i64>,
    /// Grade label (e.g. "3rd Grade").
    pub grade: Option<String>,
    pub school_type: SchoolType,
    /// Ordered, de-duplicated interest labels.
    pub interests: Vec<String>,
    pub subjects: Vec<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable fields of a child profile, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfileInput {
    pub name: String,
    pub age: Option<i64>,
    pub grade: Option<String>,
    #[serde(default)]
    pub school_type: SchoolType,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Raw `kids` row; label columns are decoded into [`ChildProfile`].
#[derive(Debug, Clone, FromRow)]
pub(crate) struct KidRow {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub age: Option<i64>,
    pub grade: Option<String>,
    pub school_type: Option<String>,
    pub interests: Option<String>,
    pub subjects: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<KidRow> for ChildProfile {
    fn from(row: KidRow) -> Self {
        Self {
            school_type: SchoolType::from_stored(row.school_type.as_deref()),
            interests: crate::labels::decode_list(row.interests.as_deref()),
            subjects: crate::labels::decode_list(row.subjects.as_deref()),
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            age: row.age,
            grade: row.grade,
            avatar: row.avatar,
            gender: row.gender,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A worksheet as shown in history listings. Never carries nulls for
/// title, subject, difficulty or status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetSummary {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub status: WorksheetStatus,
    pub created_at: String,
    pub child_id: Option<String>,
    pub child_name: String,
    pub rating: Option<i64>,
    pub regenerated_from: Option<String>,
}

/// A single worksheet including its generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetDetail {
    #[serde(flatten)]
    pub summary: WorksheetSummary,
    pub topic: Option<String>,
    pub prompt: Option<String>,
    pub content: String,
}

/// Raw worksheet row joined with the child's name.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct WorksheetRow {
    pub id: String,
    pub kid_id: Option<String>,
    pub child_name: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub rating: Option<i64>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub regenerated_from: Option<String>,
    pub created_at: String,
}

fn non_blank(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl WorksheetRow {
    fn summary(&self) -> WorksheetSummary {
        WorksheetSummary {
            id: self.id.clone(),
            title: non_blank(self.title.clone(), DEFAULT_TITLE),
            subject: non_blank(self.subject.clone(), DEFAULT_SUBJECT),
            difficulty: Difficulty::from_stored(self.difficulty.as_deref()),
            status: WorksheetStatus::from_stored(self.status.as_deref()),
            created_at: self.created_at.clone(),
            child_id: self.kid_id.clone(),
            child_name: non_blank(self.child_name.clone(), UNKNOWN_CHILD),
            rating: self.rating,
            regenerated_from: self.regenerated_from.clone(),
        }
    }
}

impl From<WorksheetRow> for WorksheetSummary {
    fn from(row: WorksheetRow) -> Self {
        row.summary()
    }
}

impl From<WorksheetRow> for WorksheetDetail {
    fn from(row: WorksheetRow) -> Self {
        Self {
            summary: row.summary(),
            topic: row.topic,
            prompt: row.prompt,
            content: row.content.unwrap_or_default(),
        }
    }
}

/// A worksheet about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorksheet {
    pub parent_id: String,
    pub kid_id: String,
    pub title: String,
    pub subject: String,
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    pub content: String,
    pub prompt: Option<String>,
    /// Worksheet this one was regenerated from, if any.
    pub regenerated_from: Option<String>,
}

/// A parent's review of a worksheet. At most one per worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetReview {
    pub id: String,
    pub worksheet_id: String,
    pub rating: i64,
    pub feedback: Option<String>,
    /// De-duplicated reaction labels picked on the review form.
    pub student_reactions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw `worksheet_reviews` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReviewRow {
    pub id: String,
    pub worksheet_id: String,
    pub rating: i64,
    pub feedback: Option<String>,
    pub student_feedback: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReviewRow> for WorksheetReview {
    fn from(row: ReviewRow) -> Self {
        Self {
            student_reactions: crate::labels::decode_reactions(row.student_feedback.as_deref()),
            id: row.id,
            worksheet_id: row.worksheet_id,
            rating: row.rating,
            feedback: row.feedback,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields submitted on the review form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub rating: i64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub student_reactions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parse_is_case_insensitive() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Completed ".parse::<WorksheetStatus>(), Ok(WorksheetStatus::Completed));
        assert_eq!("homeschool".parse::<SchoolType>(), Ok(SchoolType::Homeschool));
        assert!("Expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_from_stored_defaults() {
        assert_eq!(Difficulty::from_stored(None), Difficulty::Medium);
        assert_eq!(Difficulty::from_stored(Some("bogus")), Difficulty::Medium);
        assert_eq!(WorksheetStatus::from_stored(None), WorksheetStatus::New);
        assert_eq!(SchoolType::from_stored(Some("")), SchoolType::Public);
    }

    #[test]
    fn test_status_policy() {
        use WorksheetStatus::*;

        assert!(New.can_move_to(Downloaded, StatusPolicy::ForwardOnly));
        assert!(New.can_move_to(Completed, StatusPolicy::ForwardOnly));
        assert!(Completed.can_move_to(Completed, StatusPolicy::ForwardOnly));
        assert!(!Completed.can_move_to(New, StatusPolicy::ForwardOnly));
        assert!(!Downloaded.can_move_to(New, StatusPolicy::ForwardOnly));
        assert!(Completed.can_move_to(New, StatusPolicy::Permissive));
    }

    #[test]
    fn test_status_policy_from_str() {
        assert_eq!("forward-only".parse::<StatusPolicy>(), Ok(StatusPolicy::ForwardOnly));
        assert_eq!("Permissive".parse::<StatusPolicy>(), Ok(StatusPolicy::Permissive));
        assert!("sometimes".parse::<StatusPolicy>().is_err());
    }

    #[test]
    fn test_difficulty_from_level() {
        assert_eq!(Difficulty::from_level(1), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_level(3), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_level(4), None);
    }
}
