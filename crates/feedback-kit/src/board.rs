use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryFilter};
use crate::feedback::{Feedback, FeedbackId, FeedbackPatch};
use crate::vote::{VoteDirection, VoteTransition};

/// Ordering applied by [`BoardState::filtered_and_sorted_feedbacks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Stored order, set with [`BoardState::reorder_feedbacks`].
    Manual,
    /// Newest first.
    #[default]
    Date,
    /// Most votes first.
    Popularity,
    /// By category label.
    Category,
}

impl SortBy {
    /// Every sort mode.
    pub const ALL: [SortBy; 4] = [
        SortBy::Manual,
        SortBy::Date,
        SortBy::Popularity,
        SortBy::Category,
    ];

    /// The lowercase label used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Date => "date",
            Self::Popularity => "popularity",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown sort mode '{s}' (expected manual, date, popularity or category)")
            })
    }
}

/// Color scheme preference. Only stored, never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// The lowercase label used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// The whole board: items plus view settings.
///
/// All mutation goes through methods on this type. Operations addressed to
/// an id that is not on the board are no-ops and report so through their
/// return value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub(crate) feedbacks: Vec<Feedback>,
    pub(crate) sort_by: SortBy,
    pub(crate) filter_by_category: CategoryFilter,
    pub(crate) theme: Theme,
}

impl BoardState {
    /// A board with default settings holding `feedbacks` in the given order.
    pub fn with_feedbacks(feedbacks: Vec<Feedback>) -> Self {
        Self {
            feedbacks,
            ..Self::default()
        }
    }

    /// Items in stored order.
    pub fn feedbacks(&self) -> &[Feedback] {
        &self.feedbacks
    }

    /// Current sort mode.
    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    /// Current category filter.
    pub fn filter_by_category(&self) -> CategoryFilter {
        self.filter_by_category
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Look up an item by id.
    pub fn find(&self, id: &FeedbackId) -> Option<&Feedback> {
        self.feedbacks.iter().find(|f| f.id() == id)
    }

    fn find_mut(&mut self, id: &FeedbackId) -> Option<&mut Feedback> {
        self.feedbacks.iter_mut().find(|f| f.id() == id)
    }

    /// Append a new item and return its id.
    pub fn add_feedback(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        now: DateTime<Utc>,
    ) -> FeedbackId {
        let feedback = Feedback::new(title, description, category, now);
        let id = feedback.id().clone();
        self.feedbacks.push(feedback);
        id
    }

    /// Remove the item with `id`. Returns `false` if there was none.
    pub fn delete_feedback(&mut self, id: &FeedbackId) -> bool {
        let before = self.feedbacks.len();
        self.feedbacks.retain(|f| f.id() != id);
        self.feedbacks.len() != before
    }

    /// Merge `patch` into the item with `id`. Returns `false` if there was none.
    pub fn update_feedback(
        &mut self,
        id: &FeedbackId,
        patch: FeedbackPatch,
        now: DateTime<Utc>,
    ) -> bool {
        match self.find_mut(id) {
            Some(feedback) => {
                feedback.apply_patch(patch, now);
                true
            }
            None => false,
        }
    }

    /// Cast a vote on the item with `id`.
    ///
    /// Returns the applied transition, or `None` if there was no such item.
    pub fn vote_feedback(
        &mut self,
        id: &FeedbackId,
        direction: VoteDirection,
    ) -> Option<VoteTransition> {
        self.find_mut(id).map(|f| f.cast_vote(direction))
    }

    /// Rearrange items to follow `ordered_ids`. Only allowed in
    /// [`SortBy::Manual`]; returns `false` and changes nothing otherwise.
    ///
    /// Listed ids come first, in the listed order. Unknown and repeated ids
    /// are skipped. Items left out of the list keep their relative order and
    /// follow the listed ones.
    pub fn reorder_feedbacks(&mut self, ordered_ids: &[FeedbackId]) -> bool {
        if self.sort_by != SortBy::Manual {
            tracing::debug!(sort_by = %self.sort_by, "reorder ignored outside manual sort");
            return false;
        }

        let mut remaining = core::mem::take(&mut self.feedbacks);
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in ordered_ids {
            match remaining.iter().position(|f| f.id() == id) {
                Some(pos) => reordered.push(remaining.remove(pos)),
                None => tracing::debug!(%id, "reorder skipped unknown or repeated id"),
            }
        }

        reordered.append(&mut remaining);
        self.feedbacks = reordered;
        true
    }

    /// Replace every item, keeping the view settings.
    pub fn replace_feedbacks(&mut self, feedbacks: Vec<Feedback>) {
        self.feedbacks = feedbacks;
    }

    /// Set the sort mode.
    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
    }

    /// Set the category filter.
    pub fn set_filter_by_category(&mut self, filter: CategoryFilter) {
        self.filter_by_category = filter;
    }

    /// Set the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
