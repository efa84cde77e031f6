use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::vote::{transition, VoteDirection, VoteTransition};

/// Opaque, immutable identifier of a feedback item.
///
/// New ids are random UUID v4 strings. Imported ids are kept verbatim,
/// whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(String);

impl FeedbackId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FeedbackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FeedbackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for FeedbackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single feedback item on the board.
///
/// Fields are read through accessors. `id` and `created_at` never change
/// after construction, and `votes` only moves through [`Feedback::cast_vote`],
/// which keeps it consistent with `user_vote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    id: FeedbackId,
    title: String,
    description: String,
    category: Category,
    votes: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    user_vote: Option<VoteDirection>,
}

impl Feedback {
    /// Create a new item with no votes, stamped with `now`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: FeedbackId::generate(),
            title: title.into(),
            description: description.into(),
            category,
            votes: 0,
            created_at: now,
            updated_at: now,
            user_vote: None,
        }
    }

    /// Seed the vote tally, for items whose votes were cast elsewhere
    /// (sample data, fixtures). The local user's vote stays unset.
    pub fn with_votes(mut self, votes: i64) -> Self {
        self.votes = votes;
        self
    }

    /// Override both timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// The item's id.
    pub fn id(&self) -> &FeedbackId {
        &self.id
    }

    /// Short summary.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The item's category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Net votes. May be negative.
    pub fn votes(&self) -> i64 {
        self.votes
    }

    /// The local user's current vote, if any.
    pub fn user_vote(&self) -> Option<VoteDirection> {
        self.user_vote
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last edit.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the toggle rule for a vote in `direction`.
    ///
    /// The tally saturates at the `i64` bounds.
    pub fn cast_vote(&mut self, direction: VoteDirection) -> VoteTransition {
        let t = transition(self.user_vote, direction);
        self.votes = self.votes.saturating_add(t.delta);
        self.user_vote = t.next;
        t
    }

    /// Merge the fields set in `patch` and refresh `updated_at`.
    ///
    /// `updated_at` moves even when the patch is empty.
    pub fn apply_patch(&mut self, patch: FeedbackPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.updated_at = now;
    }
}

/// Partial update of an item's editable content.
///
/// ```
/// use feedback_kit::{Category, FeedbackPatch};
///
/// let patch = FeedbackPatch::new().title("Faster startup").category(Category::Performance);
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    pub category: Option<Category>,
}

impl FeedbackPatch {
    /// An empty patch. Applying it only refreshes `updated_at`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none()
    }
}
