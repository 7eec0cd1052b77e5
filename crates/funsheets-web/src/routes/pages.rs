//! Server-rendered pages.

use askama::Template;
use axum::extract::{Path, Query, State};
use database::{kid, review, worksheet, ChildProfile, WorksheetDetail, WorksheetReview, WorksheetSummary};
use worksheet_gen::{Subject, SUBJECTS};

use crate::error::{Result, WebError};
use crate::routes::worksheets::{history, HistoryQuery};
use crate::session::Session;
use crate::state::AppState;

const RECENT_PER_CHILD: i64 = 3;

/// A reaction choice on the review form. The emoji is the stored value.
pub struct Reaction {
    pub emoji: &'static str,
    pub label: &'static str,
}

/// Reactions offered on the review form.
pub const REACTION_CHOICES: &[Reaction] = &[
    Reaction { emoji: "😃", label: "Fun" },
    Reaction { emoji: "🧠", label: "Educational" },
    Reaction { emoji: "😕", label: "Confusing" },
    Reaction { emoji: "😴", label: "Boring" },
    Reaction { emoji: "🔥", label: "Challenging" },
    Reaction { emoji: "👍", label: "Just Right" },
];

/// A child with their latest worksheets.
pub struct ChildCard {
    pub child: ChildProfile,
    pub interests: String,
    pub recent: Vec<WorksheetSummary>,
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub profile_error: Option<String>,
    pub children: Vec<ChildCard>,
    pub worksheet_count: i64,
    pub subjects: &'static [Subject],
}

/// Render the dashboard. A profile failure still renders, with a notice.
pub async fn dashboard_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let email = session.identity.email.clone();
    let parent_id = match session.parent_id() {
        Ok(id) => id,
        Err(err) => {
            return Ok(DashboardTemplate {
                email,
                profile_error: Some(err.to_string()),
                children: Vec::new(),
                worksheet_count: 0,
                subjects: SUBJECTS,
            })
        }
    };

    let pool = state.db.pool();
    let mut children = Vec::new();
    for child in kid::list_kids(pool, parent_id).await? {
        let recent = worksheet::list_for_kid(pool, &child.id, parent_id, RECENT_PER_CHILD).await?;
        children.push(ChildCard {
            interests: child.interests.join(", "),
            child,
            recent,
        });
    }
    let worksheet_count = worksheet::count_worksheets(pool, parent_id).await?;

    Ok(DashboardTemplate {
        email,
        profile_error: None,
        children,
        worksheet_count,
        subjects: SUBJECTS,
    })
}

/// History page template.
#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub worksheets: Vec<WorksheetSummary>,
    pub children: Vec<ChildProfile>,
    pub subjects: &'static [Subject],
    pub search: String,
}

/// Render the worksheet history with the same filters as the API.
pub async fn history_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HistoryQuery>,
) -> Result<HistoryTemplate> {
    let parent_id = session.parent_id()?;
    let worksheets = history(&state, parent_id, &query).await?;
    let children = kid::list_kids(state.db.pool(), parent_id).await?;

    Ok(HistoryTemplate {
        worksheets,
        children,
        subjects: SUBJECTS,
        search: query.search.unwrap_or_default(),
    })
}

/// Review page template.
#[derive(Template)]
#[template(path = "review.html")]
pub struct ReviewTemplate {
    pub worksheet: WorksheetDetail,
    pub review: Option<WorksheetReview>,
    pub reactions: &'static [Reaction],
    pub stars: [i64; 5],
}

impl ReviewTemplate {
    fn rated(&self, star: &i64) -> bool {
        self.review.as_ref().is_some_and(|r| r.rating == *star)
    }

    fn picked(&self, reaction: &str) -> bool {
        self.review
            .as_ref()
            .is_some_and(|r| r.student_reactions.iter().any(|p| p == reaction))
    }
}

/// Render the review form for one worksheet, pre-filled when already reviewed.
pub async fn review_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ReviewTemplate> {
    let parent_id = session.parent_id()?;
    let worksheet = worksheet::get_worksheet(state.db.pool(), &id, parent_id)
        .await?
        .ok_or_else(|| WebError::NotFound("Worksheet".to_string()))?;
    let review = review::get_review(state.db.pool(), &id).await?;

    Ok(ReviewTemplate {
        worksheet,
        review,
        reactions: REACTION_CHOICES,
        stars: [1, 2, 3, 4, 5],
    })
}
