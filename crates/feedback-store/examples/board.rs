//! # Board walkthrough
//!
//! Opens a board on an in-memory store, fills it with sample data, votes,
//! switches views and prints a backup document.
//!
//! Run: `cargo run -p feedback-store --example board`

use feedback_kit::{Category, CategoryFilter, SortBy, VoteDirection};
use feedback_store::{FeedbackBoard, Inspect, MemoryStore};

fn main() {
    let mut board = FeedbackBoard::open(MemoryStore::new());
    board.load_sample_data().unwrap();

    let id = board
        .add_feedback("Keyboard shortcuts", "j/k to move between items", Category::Feature)
        .unwrap();
    board.vote_feedback(&id, VoteDirection::Up).unwrap();

    board.set_sort_by(SortBy::Popularity).unwrap();
    println!("== most popular ==");
    for f in board.filtered_and_sorted_feedbacks() {
        println!("{:>4}  [{}] {}", f.votes(), f.category(), f.title());
    }

    board
        .set_filter_by_category(CategoryFilter::Only(Category::Feature))
        .unwrap();
    println!("\n== features only ==");
    for f in board.filtered_and_sorted_feedbacks() {
        println!("{:>4}  {}", f.votes(), f.title());
    }

    let stats = board.weekly_stats();
    println!(
        "\nthis week: {} items, {} votes",
        stats.feedbacks, stats.votes
    );

    let info = board.store().store_info().unwrap();
    println!("store: {} entries", info.total_entries);

    println!("\n== {} ==", board.export_file_name());
    println!("{}", board.export_data().unwrap());
}
