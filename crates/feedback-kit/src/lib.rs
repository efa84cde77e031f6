//! # feedback-kit
//!
//! Domain model for a single-user feedback board.
//!
//! A board holds an ordered list of short feedback items. Each item can be
//! voted up or down by the local user, edited, deleted, and reordered. The
//! board also carries its view settings (sort mode, category filter, theme)
//! so that a persisted snapshot restores exactly what the user last saw.
//!
//! This crate is pure: it never touches disk. Persistence lives in
//! [`feedback-store`](../feedback_store/index.html), which wraps a
//! [`BoardState`] and writes it out after every mutation.
//!
//! ## Quick Start
//!
//! ```
//! use feedback_kit::prelude::*;
//! use chrono::Utc;
//!
//! let mut board = BoardState::default();
//! let id = board.add_feedback("Dark mode", "Please add a dark theme", Category::Ui, Utc::now());
//!
//! board.vote_feedback(&id, VoteDirection::Up);
//! assert_eq!(board.find(&id).unwrap().votes(), 1);
//!
//! // Voting the same way again retracts the vote.
//! board.vote_feedback(&id, VoteDirection::Up);
//! assert_eq!(board.find(&id).unwrap().votes(), 0);
//! assert_eq!(board.find(&id).unwrap().user_vote(), None);
//! ```
//!
//! ## Views
//!
//! - [`SortBy::Date`] - newest first
//! - [`SortBy::Popularity`] - most votes first, ties keep list order
//! - [`SortBy::Category`] - by category label, ties keep list order
//! - [`SortBy::Manual`] - list order, rearranged with
//!   [`BoardState::reorder_feedbacks`]
//!
//! ## Exchange
//!
//! [`BoardState::export_json`] produces the backup document and
//! [`BoardState::import_json`] reads one back. Import is all-or-nothing:
//! a malformed document never changes the board.

#![warn(missing_docs)]

mod board;
mod category;
mod exchange;
mod feedback;
mod query;
mod vote;

pub mod clock;
pub mod prelude;
pub mod sample;

pub use board::{BoardState, SortBy, Theme};
pub use category::{Category, CategoryFilter, ParseCategoryError};
pub use exchange::{export_file_name, BoardDocument, ExchangeError, EXPORT_FILE_PREFIX};
pub use feedback::{Feedback, FeedbackId, FeedbackPatch};
pub use query::{WeeklyStats, WEEKLY_WINDOW_HOURS};
pub use vote::{transition, VoteDirection, VoteTransition};
