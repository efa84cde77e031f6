//! End-to-end board scenarios over every available backend.

use chrono::{DateTime, Duration, TimeZone, Utc};
use feedback_kit::clock::ManualClock;
use feedback_kit::{Category, CategoryFilter, FeedbackId, FeedbackPatch, SortBy, Theme, VoteDirection};
use feedback_store::{FeedbackBoard, MemoryStore, StateStore};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 8, 30, 0).unwrap()
}

fn open<S: StateStore>(store: S) -> FeedbackBoard<S, ManualClock> {
    FeedbackBoard::builder(store)
        .clock(ManualClock::new(start()))
        .build()
}

fn ids<S: StateStore>(board: &FeedbackBoard<S, ManualClock>) -> Vec<FeedbackId> {
    board
        .filtered_and_sorted_feedbacks()
        .into_iter()
        .map(|f| f.id().clone())
        .collect()
}

/// Runs a full session against `store` and returns it for reopening.
fn session<S: StateStore>(store: S) -> S {
    let mut board = open(store);

    let slow = board
        .add_feedback("Slow search", "Takes seconds on large boards", Category::Performance)
        .unwrap();
    board.clock().advance(Duration::minutes(10));
    let crash = board
        .add_feedback("Crash on paste", "Pasting emoji crashes the editor", Category::Bug)
        .unwrap();
    board.clock().advance(Duration::minutes(10));
    let tabs = board
        .add_feedback("Tabs", "Open several boards at once", Category::Feature)
        .unwrap();

    // Date: newest first.
    assert_eq!(ids(&board), vec![tabs.clone(), crash.clone(), slow.clone()]);

    board.vote_feedback(&crash, VoteDirection::Up).unwrap();
    board.vote_feedback(&tabs, VoteDirection::Down).unwrap();
    board.vote_feedback(&tabs, VoteDirection::Up).unwrap();
    assert_eq!(board.state().find(&tabs).unwrap().votes(), 1);

    // Popularity: ties keep list order.
    board.set_sort_by(SortBy::Popularity).unwrap();
    assert_eq!(ids(&board), vec![crash.clone(), tabs.clone(), slow.clone()]);

    // Category: Bug < Feature < Performance.
    board.set_sort_by(SortBy::Category).unwrap();
    assert_eq!(ids(&board), vec![crash.clone(), tabs.clone(), slow.clone()]);

    board.set_sort_by(SortBy::Manual).unwrap();
    assert!(board.reorder_feedbacks(&[slow.clone()]).unwrap());
    assert_eq!(ids(&board), vec![slow.clone(), crash.clone(), tabs.clone()]);

    board
        .update_feedback(&slow, FeedbackPatch::new().category(Category::Bug))
        .unwrap();
    board
        .set_filter_by_category(CategoryFilter::Only(Category::Bug))
        .unwrap();
    assert_eq!(ids(&board), vec![slow, crash]);

    board.toggle_theme().unwrap();
    board.into_store()
}

fn check_restored<S: StateStore>(store: S) {
    let board = open(store);
    assert_eq!(board.total_feedbacks(), 3);
    assert_eq!(board.state().sort_by(), SortBy::Manual);
    assert_eq!(
        board.state().filter_by_category(),
        CategoryFilter::Only(Category::Bug)
    );
    assert_eq!(board.state().theme(), Theme::Dark);

    let titles: Vec<&str> = board.state().feedbacks().iter().map(|f| f.title()).collect();
    assert_eq!(titles, vec!["Slow search", "Crash on paste", "Tabs"]);

    let crash = &board.state().feedbacks()[1];
    assert_eq!(crash.votes(), 1);
    assert_eq!(crash.user_vote(), Some(VoteDirection::Up));
}

#[test]
fn memory_session_survives_reopen() {
    let store = session(MemoryStore::new());
    check_restored(store);
}

#[test]
fn backup_moves_a_board_between_stores() {
    let mut source = open(MemoryStore::new());
    source.load_sample_data().unwrap();
    source.set_sort_by(SortBy::Popularity).unwrap();
    let json = source.export_data().unwrap();

    let mut target = open(MemoryStore::new());
    target.import_data(&json).unwrap();
    assert_eq!(target.state(), source.state());

    let reopened = open(target.into_store());
    assert_eq!(reopened.state(), source.state());
}

#[test]
fn weekly_window_is_strict() {
    let mut board = open(MemoryStore::new());
    let id = board.add_feedback("Edge", "exactly a week old", Category::Ui).unwrap();
    board.vote_feedback(&id, VoteDirection::Up).unwrap();

    board.clock().advance(Duration::days(7) - Duration::seconds(1));
    assert_eq!(board.weekly_stats().feedbacks, 1);
    assert_eq!(board.weekly_stats().votes, 1);

    board.clock().advance(Duration::seconds(1));
    assert_eq!(board.weekly_stats().feedbacks, 0);
    assert_eq!(board.weekly_stats().votes, 0);
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_session_survives_reopen() {
    use feedback_store::SqliteStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let store = session(SqliteStore::open(&path).unwrap());
    drop(store);
    check_restored(SqliteStore::open(&path).unwrap());
}

#[cfg(feature = "redb")]
#[test]
fn redb_session_survives_reopen() {
    use feedback_store::RedbStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.redb");

    let store = session(RedbStore::open(&path).unwrap());
    drop(store);
    check_restored(RedbStore::open(&path).unwrap());
}
