//! Convenient re-exports for common usage.
//!
//! ```
//! use feedback_kit::prelude::*;
//! ```

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::{
    BoardState, Category, CategoryFilter, Feedback, FeedbackId, FeedbackPatch, SortBy, Theme,
    VoteDirection, VoteTransition, WeeklyStats,
};
