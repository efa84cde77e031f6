//! The persisting board.
//!
//! `FeedbackBoard` owns a [`BoardState`], a [`StateStore`] and a [`Clock`].
//! It restores the state from one store slot when opened and writes the
//! whole snapshot back after every change.
//!
//! # Example
//!
//! ```
//! use feedback_kit::{Category, SortBy, VoteDirection};
//! use feedback_store::{FeedbackBoard, MemoryStore};
//!
//! let mut board = FeedbackBoard::open(MemoryStore::new());
//! let id = board.add_feedback("Dark mode", "Easier on the eyes", Category::Ui).unwrap();
//! board.vote_feedback(&id, VoteDirection::Up).unwrap();
//! board.set_sort_by(SortBy::Popularity).unwrap();
//!
//! // A second board over the same store sees the same state.
//! let store = board.into_store();
//! let reopened = FeedbackBoard::open(store);
//! assert_eq!(reopened.total_feedbacks(), 1);
//! assert_eq!(reopened.state().sort_by(), SortBy::Popularity);
//! ```

use core::fmt;

use feedback_kit::clock::{Clock, SystemClock};
use feedback_kit::sample::sample_feedbacks;
use feedback_kit::{
    export_file_name, BoardState, Category, CategoryFilter, ExchangeError, Feedback, FeedbackId,
    FeedbackPatch, SortBy, Theme, VoteDirection, VoteTransition, WeeklyStats,
};

use crate::snapshot;
use crate::traits::StateStore;

/// Namespace the board is stored under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "feedback";
/// Key the board is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "feedback-store";

/// Error type for [`FeedbackBoard`] operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError<E: fmt::Debug + fmt::Display> {
    /// Writing the snapshot failed. The in-memory change is kept.
    #[error("store error: {0}")]
    Store(E),
    /// A document could not be read or written.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Where in the store the board lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Store namespace.
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

/// Builder for a [`FeedbackBoard`] with a custom slot or clock.
pub struct BoardBuilder<S: StateStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: BoardConfig,
}

impl<S: StateStore, C: Clock> BoardBuilder<S, C> {
    /// Set the store namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Set the key within the namespace.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.key = key.into();
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `clock` instead of the system clock.
    pub fn clock<C2: Clock>(self, clock: C2) -> BoardBuilder<S, C2> {
        BoardBuilder {
            store: self.store,
            clock,
            config: self.config,
        }
    }

    /// Restore the board from the store.
    pub fn build(self) -> FeedbackBoard<S, C> {
        let state = restore(&self.store, &self.config);
        FeedbackBoard {
            store: self.store,
            clock: self.clock,
            config: self.config,
            state,
        }
    }
}

/// A feedback board that persists itself.
///
/// Every mutating call writes the full snapshot to the store once the
/// in-memory change is made. Calls addressed to an id that is not on the
/// board change nothing, write nothing and report `false` or `None`.
pub struct FeedbackBoard<S: StateStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: BoardConfig,
    state: BoardState,
}

impl<S: StateStore> FeedbackBoard<S, SystemClock> {
    /// Open the board stored in the default slot, or an empty board.
    pub fn open(store: S) -> Self {
        Self::builder(store).build()
    }

    /// Start configuring a board over `store`.
    pub fn builder(store: S) -> BoardBuilder<S, SystemClock> {
        BoardBuilder {
            store,
            clock: SystemClock,
            config: BoardConfig::default(),
        }
    }
}

impl<S: StateStore, C: Clock> FeedbackBoard<S, C> {
    /// Current state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock used for timestamps.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Where the board is stored.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Give back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    // ── mutations ───────────────────────────────────────────────────

    /// Append a new item and return its id.
    pub fn add_feedback(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Result<FeedbackId, BoardError<S::Error>> {
        let now = self.clock.now();
        let id = self.state.add_feedback(title, description, category, now);
        tracing::debug!(%id, %category, "feedback added");
        self.persist()?;
        Ok(id)
    }

    /// Remove an item. Returns `false` if it was not on the board.
    pub fn delete_feedback(&mut self, id: &FeedbackId) -> Result<bool, BoardError<S::Error>> {
        if !self.state.delete_feedback(id) {
            tracing::debug!(%id, "delete ignored, no such feedback");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Merge `patch` into an item and refresh its `updatedAt`.
    /// Returns `false` if it was not on the board.
    pub fn update_feedback(
        &mut self,
        id: &FeedbackId,
        patch: FeedbackPatch,
    ) -> Result<bool, BoardError<S::Error>> {
        let now = self.clock.now();
        if !self.state.update_feedback(id, patch, now) {
            tracing::debug!(%id, "update ignored, no such feedback");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Toggle a vote on an item.
    pub fn vote_feedback(
        &mut self,
        id: &FeedbackId,
        direction: VoteDirection,
    ) -> Result<Option<VoteTransition>, BoardError<S::Error>> {
        let Some(transition) = self.state.vote_feedback(id, direction) else {
            tracing::debug!(%id, "vote ignored, no such feedback");
            return Ok(None);
        };
        tracing::debug!(%id, %direction, delta = transition.delta, "vote applied");
        self.persist()?;
        Ok(Some(transition))
    }

    /// Rearrange items. Only allowed in manual sort mode; see
    /// [`BoardState::reorder_feedbacks`] for the ordering rules.
    pub fn reorder_feedbacks(
        &mut self,
        ordered_ids: &[FeedbackId],
    ) -> Result<bool, BoardError<S::Error>> {
        if !self.state.reorder_feedbacks(ordered_ids) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Set the sort mode.
    pub fn set_sort_by(&mut self, sort_by: SortBy) -> Result<(), BoardError<S::Error>> {
        self.state.set_sort_by(sort_by);
        self.persist()
    }

    /// Set the category filter.
    pub fn set_filter_by_category(
        &mut self,
        filter: CategoryFilter,
    ) -> Result<(), BoardError<S::Error>> {
        self.state.set_filter_by_category(filter);
        self.persist()
    }

    /// Set the theme.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), BoardError<S::Error>> {
        self.state.set_theme(theme);
        self.persist()
    }

    /// Switch between light and dark. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, BoardError<S::Error>> {
        let theme = self.state.theme().toggled();
        self.state.set_theme(theme);
        self.persist()?;
        Ok(theme)
    }

    /// Replace every item with the demo set. View settings are kept.
    pub fn load_sample_data(&mut self) -> Result<(), BoardError<S::Error>> {
        let items = sample_feedbacks(self.clock.now());
        tracing::info!(count = items.len(), "loading sample feedback");
        self.state.replace_feedbacks(items);
        self.persist()
    }

    // ── queries ─────────────────────────────────────────────────────

    /// Number of items, ignoring the filter.
    pub fn total_feedbacks(&self) -> usize {
        self.state.total_feedbacks()
    }

    /// Items passing the category filter, in the current sort order.
    pub fn filtered_and_sorted_feedbacks(&self) -> Vec<&Feedback> {
        self.state.filtered_and_sorted_feedbacks()
    }

    /// Items created in the last seven days and their votes.
    pub fn weekly_stats(&self) -> WeeklyStats {
        self.state.weekly_stats(self.clock.now())
    }

    // ── exchange ────────────────────────────────────────────────────

    /// Backup document for the current board.
    pub fn export_data(&self) -> Result<String, ExchangeError> {
        self.state.export_json(self.clock.now())
    }

    /// Suggested file name for a backup taken now.
    pub fn export_file_name(&self) -> String {
        export_file_name(self.clock.now())
    }

    /// Replace the board with the contents of a backup document.
    ///
    /// A rejected document leaves the board untouched.
    pub fn import_data(&mut self, text: &str) -> Result<(), BoardError<S::Error>> {
        let imported = match BoardState::import_json(text) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                return Err(e.into());
            }
        };
        tracing::info!(count = imported.total_feedbacks(), "board imported");
        self.state = imported;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), BoardError<S::Error>> {
        let bytes = snapshot::encode(&self.state)?;
        self.store
            .put(&self.config.namespace, &self.config.key, &bytes)
            .map_err(BoardError::Store)?;
        tracing::debug!(
            namespace = %self.config.namespace,
            key = %self.config.key,
            bytes = bytes.len(),
            "snapshot written"
        );
        Ok(())
    }
}

impl<S: StateStore + fmt::Debug, C: Clock + fmt::Debug> fmt::Debug for FeedbackBoard<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackBoard")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

fn restore<S: StateStore>(store: &S, config: &BoardConfig) -> BoardState {
    let bytes = match store.get(&config.namespace, &config.key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!(namespace = %config.namespace, key = %config.key, "no snapshot, starting empty");
            return BoardState::default();
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read snapshot, starting empty");
            return BoardState::default();
        }
    };

    match snapshot::decode(&bytes) {
        Ok(state) => {
            tracing::debug!(count = state.total_feedbacks(), "snapshot restored");
            state
        }
        Err(e) => {
            tracing::warn!(error = %e, "unreadable snapshot, starting empty");
            BoardState::default()
        }
    }
}
