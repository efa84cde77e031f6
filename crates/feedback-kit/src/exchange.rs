//! JSON backup documents.
//!
//! Export writes every item field plus the view settings and an
//! `exportedAt` stamp. Import is lenient about what is *missing* (absent or
//! `null` top-level fields fall back to defaults) and strict about what is
//! *wrong* (bad JSON, unknown labels, incomplete items, duplicate ids). A
//! rejected document never produces a partial board.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, SortBy, Theme};
use crate::category::CategoryFilter;
use crate::feedback::{Feedback, FeedbackId};

/// File name prefix for exported backups.
pub const EXPORT_FILE_PREFIX: &str = "feedback-backup";

/// Errors produced while reading or writing board documents.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The text is not a valid board document.
    #[error("malformed board document: {0}")]
    Parse(#[source] serde_json::Error),
    /// Encoding the board failed.
    #[error("failed to encode board: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Two items share an id.
    #[error("duplicate feedback id '{0}'")]
    DuplicateId(FeedbackId),
}

/// `feedback-backup-YYYY-MM-DD.json` for the given day.
pub fn export_file_name(date: DateTime<Utc>) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    feedbacks: &'a [Feedback],
    sort_by: SortBy,
    filter_by_category: CategoryFilter,
    theme: Theme,
    exported_at: DateTime<Utc>,
}

/// A board as read from JSON, before defaults are filled in.
///
/// Every field is optional. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    /// Items, if present.
    pub feedbacks: Option<Vec<Feedback>>,
    /// Sort mode, if present.
    pub sort_by: Option<SortBy>,
    /// Category filter, if present.
    pub filter_by_category: Option<CategoryFilter>,
    /// Theme, if present.
    pub theme: Option<Theme>,
}

impl BoardDocument {
    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self, ExchangeError> {
        serde_json::from_str(text).map_err(ExchangeError::Parse)
    }

    /// Fill in defaults and check that item ids are unique.
    pub fn into_state(self) -> Result<BoardState, ExchangeError> {
        let feedbacks = self.feedbacks.unwrap_or_default();

        let mut seen = HashSet::with_capacity(feedbacks.len());
        if let Some(dup) = feedbacks.iter().find(|f| !seen.insert(f.id())) {
            return Err(ExchangeError::DuplicateId(dup.id().clone()));
        }

        Ok(BoardState {
            feedbacks,
            sort_by: self.sort_by.unwrap_or_default(),
            filter_by_category: self.filter_by_category.unwrap_or_default(),
            theme: self.theme.unwrap_or_default(),
        })
    }
}

impl BoardState {
    /// Pretty-printed backup document stamped with `exported_at`.
    pub fn export_json(&self, exported_at: DateTime<Utc>) -> Result<String, ExchangeError> {
        let doc = ExportDocument {
            feedbacks: &self.feedbacks,
            sort_by: self.sort_by,
            filter_by_category: self.filter_by_category,
            theme: self.theme,
            exported_at,
        };
        serde_json::to_string_pretty(&doc).map_err(ExchangeError::Serialize)
    }

    /// Build a board from a backup document.
    ///
    /// ```
    /// use feedback_kit::{BoardState, CategoryFilter, SortBy, Theme};
    ///
    /// let board = BoardState::import_json(r#"{"feedbacks":[],"sortBy":"popularity"}"#).unwrap();
    /// assert_eq!(board.sort_by(), SortBy::Popularity);
    /// assert_eq!(board.filter_by_category(), CategoryFilter::All);
    /// assert_eq!(board.theme(), Theme::Light);
    /// ```
    pub fn import_json(text: &str) -> Result<Self, ExchangeError> {
        BoardDocument::parse(text)?.into_state()
    }
}
