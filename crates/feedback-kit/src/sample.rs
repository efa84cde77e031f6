//! Demo content for an empty board.

use chrono::{DateTime, Duration, Utc};

use crate::category::Category;
use crate::feedback::Feedback;

const SAMPLES: [(&str, &str, Category, i64); 6] = [
    (
        "Refresh the landing page design",
        "The current design looks dated. Update the color scheme and bring in modern interface elements.",
        Category::Ui,
        15,
    ),
    (
        "Speed up page loads",
        "Pages load too slowly, especially on mobile. Optimize images and trim the bundle.",
        Category::Performance,
        23,
    ),
    (
        "Allow exporting data",
        "Users ask to export their data in several formats (CSV, JSON, PDF).",
        Category::Feature,
        8,
    ),
    (
        "Settings are lost after reload",
        "User settings are not kept after reloading the page. Reproducible in Firefox.",
        Category::Bug,
        31,
    ),
    (
        "Add a dark theme",
        "Many users want to switch to a dark theme for comfortable evening work.",
        Category::Ui,
        42,
    ),
    (
        "Integrate with external APIs",
        "Connect popular services through their APIs to keep data in sync.",
        Category::Feature,
        12,
    ),
];

/// Six example items with seeded vote tallies, all created within the week
/// before `now`.
///
/// Creation times are staggered a little over a day apart so that every
/// sort mode produces a distinct ordering.
pub fn sample_feedbacks(now: DateTime<Utc>) -> Vec<Feedback> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, (title, description, category, votes))| {
            let step = i as i64 + 1;
            let created_at = now - Duration::hours(step * 26);
            let updated_at = created_at + Duration::hours(step * 3);
            Feedback::new(*title, *description, *category, created_at)
                .with_votes(*votes)
                .with_timestamps(created_at, updated_at)
        })
        .collect()
}
