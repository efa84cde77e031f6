//! Read-only views derived from a [`BoardState`].

use core::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, SortBy};
use crate::feedback::Feedback;

/// Length of the statistics window, in hours.
pub const WEEKLY_WINDOW_HOURS: i64 = 7 * 24;

/// Activity among items created within the last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyStats {
    /// Number of items created in the window.
    pub feedbacks: usize,
    /// Sum of the current votes of those items.
    pub votes: i64,
}

impl BoardState {
    /// Number of items, ignoring the category filter.
    pub fn total_feedbacks(&self) -> usize {
        self.feedbacks.len()
    }

    /// Items passing the category filter, ordered by the sort mode.
    ///
    /// All orderings are stable: items that compare equal keep their
    /// stored order.
    pub fn filtered_and_sorted_feedbacks(&self) -> Vec<&Feedback> {
        let mut items: Vec<&Feedback> = self
            .feedbacks
            .iter()
            .filter(|f| self.filter_by_category.matches(f.category()))
            .collect();

        match self.sort_by {
            SortBy::Manual => {}
            SortBy::Date => items.sort_by_key(|f| Reverse(f.created_at())),
            SortBy::Popularity => items.sort_by_key(|f| Reverse(f.votes())),
            SortBy::Category => items.sort_by_key(|f| f.category().label()),
        }

        items
    }

    /// Count and vote total of items created strictly after
    /// `now - WEEKLY_WINDOW_HOURS`. The vote total saturates.
    pub fn weekly_stats(&self, now: DateTime<Utc>) -> WeeklyStats {
        let cutoff = now - Duration::hours(WEEKLY_WINDOW_HOURS);

        self.feedbacks
            .iter()
            .filter(|f| f.created_at() > cutoff)
            .fold(WeeklyStats::default(), |acc, f| WeeklyStats {
                feedbacks: acc.feedbacks + 1,
                votes: acc.votes.saturating_add(f.votes()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryFilter};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn item(title: &str, category: Category, votes: i64, age_hours: i64) -> Feedback {
        let created = now() - Duration::hours(age_hours);
        Feedback::new(title, "desc", category, created)
            .with_votes(votes)
            .with_timestamps(created, created)
    }

    fn sample_board() -> BoardState {
        BoardState::with_feedbacks(vec![
            item("ui-old", Category::Ui, 5, 200),
            item("bug-new", Category::Bug, 10, 1),
            item("perf", Category::Performance, 5, 50),
            item("feat", Category::Feature, -2, 20),
            item("ui-new", Category::Ui, 10, 2),
        ])
    }

    fn titles(items: &[&Feedback]) -> Vec<String> {
        items.iter().map(|f| f.title().to_string()).collect()
    }

    #[test]
    fn total_ignores_filter() {
        let mut board = sample_board();
        board.set_filter_by_category(CategoryFilter::Only(Category::Bug));
        assert_eq!(board.total_feedbacks(), 5);
        assert_eq!(board.filtered_and_sorted_feedbacks().len(), 1);
    }

    #[test]
    fn date_newest_first() {
        let board = sample_board();
        let sorted = board.filtered_and_sorted_feedbacks();
        assert_eq!(
            titles(&sorted),
            ["bug-new", "ui-new", "feat", "perf", "ui-old"]
        );
    }

    #[test]
    fn popularity_ties_keep_stored_order() {
        let mut board = sample_board();
        board.set_sort_by(SortBy::Popularity);
        let sorted = board.filtered_and_sorted_feedbacks();
        assert_eq!(
            titles(&sorted),
            ["bug-new", "ui-new", "ui-old", "perf", "feat"]
        );
    }

    #[test]
    fn category_ascending_by_label_and_stable() {
        let mut board = sample_board();
        board.set_sort_by(SortBy::Category);
        let sorted = board.filtered_and_sorted_feedbacks();
        assert_eq!(
            titles(&sorted),
            ["bug-new", "feat", "perf", "ui-old", "ui-new"]
        );
    }

    #[test]
    fn manual_keeps_stored_order() {
        let mut board = sample_board();
        board.set_sort_by(SortBy::Manual);
        let sorted = board.filtered_and_sorted_feedbacks();
        assert_eq!(
            titles(&sorted),
            ["ui-old", "bug-new", "perf", "feat", "ui-new"]
        );
    }

    #[test]
    fn filter_then_sort() {
        let mut board = sample_board();
        board.set_filter_by_category(CategoryFilter::Only(Category::Ui));
        board.set_sort_by(SortBy::Popularity);
        let sorted = board.filtered_and_sorted_feedbacks();
        assert_eq!(titles(&sorted), ["ui-new", "ui-old"]);
    }

    #[test]
    fn weekly_stats_counts_recent_items() {
        let board = sample_board();
        // ui-old (200h) falls outside the 168h window.
        let stats = board.weekly_stats(now());
        assert_eq!(stats, WeeklyStats { feedbacks: 4, votes: 23 });
    }

    #[test]
    fn weekly_window_is_exclusive_at_the_edge() {
        let board = BoardState::with_feedbacks(vec![
            item("edge", Category::Bug, 3, WEEKLY_WINDOW_HOURS),
            item("inside", Category::Bug, 4, WEEKLY_WINDOW_HOURS - 1),
        ]);
        let stats = board.weekly_stats(now());
        assert_eq!(stats, WeeklyStats { feedbacks: 1, votes: 4 });
    }

    #[test]
    fn weekly_vote_total_saturates() {
        let board = BoardState::with_feedbacks(vec![
            item("max", Category::Bug, i64::MAX, 1),
            item("one", Category::Bug, 1, 2),
            item("min", Category::Ui, i64::MIN, 3),
        ]);
        // MAX + 1 clamps to MAX, then MAX + MIN = -1.
        assert_eq!(board.weekly_stats(now()), WeeklyStats { feedbacks: 3, votes: -1 });
    }

    #[test]
    fn weekly_stats_empty_board() {
        assert_eq!(
            BoardState::default().weekly_stats(now()),
            WeeklyStats::default()
        );
    }
}
