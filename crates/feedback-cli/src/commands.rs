use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use console::style;
use feedback_kit::{
    BoardState, Category, CategoryFilter, Feedback, FeedbackId, FeedbackPatch, SortBy, Theme,
    VoteDirection,
};
use feedback_store::{FeedbackBoard, Inspect, StateStore};
use inquire::{Confirm, Select, Text};

use crate::Backend;

type Result = anyhow::Result<()>;

/// Where the board was opened from, for status output.
pub struct Location {
    pub path: PathBuf,
    pub backend: Backend,
}

/// `feedback status`: Show totals, weekly stats, view settings and storage.
pub fn status<S>(board: &FeedbackBoard<S>, location: &Location) -> Result
where
    S: Inspect,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let state = board.state();
    let stats = board.weekly_stats();
    let info = board.store().store_info()?;

    println!(
        "Board: {} ({})",
        location.path.display(),
        location.backend.as_str()
    );
    println!(
        "Items: {} total, {} shown",
        format_num(board.total_feedbacks() as u64),
        format_num(board.filtered_and_sorted_feedbacks().len() as u64)
    );
    println!(
        "This week: {} items, {} votes",
        format_num(stats.feedbacks as u64),
        stats.votes
    );
    println!(
        "View: sort by {}, filter {}, {} theme",
        state.sort_by(),
        state.filter_by_category(),
        state.theme()
    );
    println!();

    if info.namespaces.is_empty() {
        println!("  (nothing stored yet)");
        return Ok(());
    }

    println!("  {:<20} {:>10} {:>10}", "Namespace", "Entries", "Size");
    println!("  {}", "-".repeat(42));
    for ns in &info.namespaces {
        println!(
            "  {:<20} {:>10} {:>10}",
            ns.name,
            format_num(ns.entry_count),
            format_bytes(ns.total_bytes)
        );
    }
    println!();

    Ok(())
}

/// `feedback list`: Items under the current filter and sort.
pub fn list<S: StateStore>(board: &FeedbackBoard<S>, json: bool) -> Result {
    let items = board.filtered_and_sorted_feedbacks();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("  (no feedback)");
        return Ok(());
    }

    println!(
        "  {:<8}  {:>6}  {:<11}  {}",
        "Id", "Votes", "Category", "Title"
    );
    println!("  {}", "-".repeat(60));
    for f in &items {
        println!(
            "  {:<8}  {:>6}  {:<11}  {}",
            short_id(f.id()),
            vote_cell(f),
            f.category().label(),
            truncate(f.title(), 48)
        );
    }

    let state = board.state();
    if state.filter_by_category() != CategoryFilter::All {
        println!();
        println!(
            "  {} of {} items (filter: {})",
            items.len(),
            board.total_feedbacks(),
            state.filter_by_category()
        );
    }

    Ok(())
}

/// `feedback add`: Add an item, prompting for missing fields.
pub fn add<S>(
    board: &mut FeedbackBoard<S>,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let title = match title {
        Some(t) => t,
        None => Text::new("Title:").prompt()?,
    };
    let title = require_text("title", &title)?;

    let description = match description {
        Some(d) => d,
        None => Text::new("Description:").prompt()?,
    };
    let description = require_text("description", &description)?;

    let category = match category {
        Some(c) => c,
        None => Select::new("Category:", Category::ALL.to_vec()).prompt()?,
    };

    let id = board.add_feedback(title, description, category)?;
    println!("{} {}", style("Added").green(), id);
    Ok(())
}

/// `feedback edit <id>`: Change content fields of an item.
pub fn edit<S>(
    board: &mut FeedbackBoard<S>,
    prefix: &str,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let id = resolve_id(board.state(), prefix)?;

    let mut patch = FeedbackPatch::new();
    if let Some(t) = title {
        patch = patch.title(require_text("title", &t)?);
    }
    if let Some(d) = description {
        patch = patch.description(require_text("description", &d)?);
    }
    if let Some(c) = category {
        patch = patch.category(c);
    }
    if patch.is_empty() {
        bail!("nothing to change (use --title, --description or --category)");
    }

    board.update_feedback(&id, patch)?;
    println!("{} {}", style("Updated").green(), id);
    Ok(())
}

/// `feedback delete <id>`: Remove an item after confirmation.
pub fn delete<S>(board: &mut FeedbackBoard<S>, prefix: &str, yes: bool) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let id = resolve_id(board.state(), prefix)?;

    if !yes {
        let title = board
            .state()
            .find(&id)
            .map(|f| f.title().to_string())
            .unwrap_or_default();
        let confirmed = Confirm::new(&format!("Delete \"{title}\"?"))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    board.delete_feedback(&id)?;
    println!("{} {}", style("Deleted").red(), id);
    Ok(())
}

/// `feedback vote <id> <up|down>`: Toggle a vote.
pub fn vote<S>(board: &mut FeedbackBoard<S>, prefix: &str, direction: VoteDirection) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let id = resolve_id(board.state(), prefix)?;
    let Some(transition) = board.vote_feedback(&id, direction)? else {
        bail!("no feedback with id {id}");
    };

    let votes = board.state().find(&id).map(|f| f.votes()).unwrap_or_default();
    let action = match transition.next {
        Some(dir) => format!("voted {dir}"),
        None => "vote retracted".to_string(),
    };
    println!("{action} ({:+}), now {votes}", transition.delta);
    Ok(())
}

/// `feedback reorder <id>...`: Move items to the top in manual mode.
pub fn reorder<S>(board: &mut FeedbackBoard<S>, prefixes: &[String]) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    if board.state().sort_by() != SortBy::Manual {
        bail!(
            "reordering only works in manual sort mode (currently {}); run `feedback sort manual` first",
            board.state().sort_by()
        );
    }

    let ids = prefixes
        .iter()
        .map(|p| resolve_id(board.state(), p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    board.reorder_feedbacks(&ids)?;
    println!("Reordered {} items", ids.len());
    Ok(())
}

/// `feedback sort <mode>`
pub fn sort<S>(board: &mut FeedbackBoard<S>, mode: SortBy) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    board.set_sort_by(mode)?;
    println!("Sorting by {mode}");
    Ok(())
}

/// `feedback filter <category|all>`
pub fn filter<S>(board: &mut FeedbackBoard<S>, filter: CategoryFilter) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    board.set_filter_by_category(filter)?;
    println!("Showing {filter}");
    Ok(())
}

/// `feedback theme [light|dark]`
pub fn theme<S>(board: &mut FeedbackBoard<S>, theme: Option<Theme>) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let theme = match theme {
        Some(t) => {
            board.set_theme(t)?;
            t
        }
        None => board.toggle_theme()?,
    };
    println!("Theme: {theme}");
    Ok(())
}

/// `feedback stats`: Weekly stats.
pub fn stats<S: StateStore>(board: &FeedbackBoard<S>) -> Result {
    let stats = board.weekly_stats();
    println!("Last 7 days:");
    println!("  {:<10} {:>8}", "Items", format_num(stats.feedbacks as u64));
    println!("  {:<10} {:>8}", "Votes", stats.votes);
    Ok(())
}

/// `feedback export`: Write a JSON backup.
pub fn export<S: StateStore>(
    board: &FeedbackBoard<S>,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result {
    let json = board.export_data()?;

    if stdout {
        println!("{json}");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(board.export_file_name()));
    fs::write(&path, &json).with_context(|| format!("cannot write {}", path.display()))?;
    println!(
        "Exported {} items to {} ({})",
        board.total_feedbacks(),
        path.display(),
        format_bytes(json.len() as u64)
    );
    Ok(())
}

/// `feedback import <file>`: Replace the board with a backup.
pub fn import<S>(board: &mut FeedbackBoard<S>, file: &Path) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let text =
        fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;
    board
        .import_data(&text)
        .with_context(|| format!("{} is not a valid backup", file.display()))?;
    println!(
        "Imported {} items from {}",
        board.total_feedbacks(),
        file.display()
    );
    Ok(())
}

/// `feedback sample`: Load example feedback.
pub fn sample<S>(board: &mut FeedbackBoard<S>) -> Result
where
    S: StateStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    board.load_sample_data()?;
    println!("Loaded {} sample items", board.total_feedbacks());
    Ok(())
}

// ── helpers ─────────────────────────────────────────────────────────

/// Find the item whose id equals `prefix`, or the single one starting with it.
fn resolve_id(state: &BoardState, prefix: &str) -> anyhow::Result<FeedbackId> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("empty id");
    }

    if let Some(exact) = state.feedbacks().iter().find(|f| f.id().as_str() == prefix) {
        return Ok(exact.id().clone());
    }

    let mut matches = state
        .feedbacks()
        .iter()
        .filter(|f| f.id().as_str().starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id().clone()),
        (None, _) => bail!("no feedback matches '{prefix}'"),
        (Some(_), Some(_)) => bail!(
            "'{prefix}' matches {} items; use a longer prefix",
            2 + matches.count()
        ),
    }
}

fn require_text(field: &str, value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(trimmed.to_string())
}

fn short_id(id: &FeedbackId) -> &str {
    let s = id.as_str();
    s.char_indices().nth(8).map_or(s, |(end, _)| &s[..end])
}

fn vote_cell(f: &Feedback) -> String {
    let marker = match f.user_vote() {
        Some(VoteDirection::Up) => "^",
        Some(VoteDirection::Down) => "v",
        None => " ",
    };
    format!("{}{marker}", f.votes())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn format_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn board_with_ids(ids: &[&str]) -> BoardState {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::json!({
            "feedbacks": ids.iter().map(|id| serde_json::json!({
                "id": id,
                "title": format!("item {id}"),
                "description": "d",
                "category": "Bug",
                "votes": 0,
                "createdAt": now,
                "updatedAt": now,
            })).collect::<Vec<_>>()
        });
        BoardState::import_json(&json.to_string()).unwrap()
    }

    #[test]
    fn resolve_unique_prefix() {
        let state = board_with_ids(&["abc123", "abd456", "xyz"]);
        assert_eq!(resolve_id(&state, "abc").unwrap().as_str(), "abc123");
        assert_eq!(resolve_id(&state, "x").unwrap().as_str(), "xyz");
    }

    #[test]
    fn resolve_exact_beats_longer_matches() {
        let state = board_with_ids(&["ab", "abc"]);
        assert_eq!(resolve_id(&state, "ab").unwrap().as_str(), "ab");
    }

    #[test]
    fn resolve_rejects_ambiguous_and_unknown() {
        let state = board_with_ids(&["abc123", "abd456", "abe789"]);
        let err = resolve_id(&state, "ab").unwrap_err().to_string();
        assert!(err.contains("matches 3 items"), "{err}");
        assert!(resolve_id(&state, "zz").is_err());
        assert!(resolve_id(&state, "  ").is_err());
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Dark mode \n").unwrap(), "Dark mode");
        assert!(require_text("title", "   ").is_err());
    }

    #[test]
    fn short_id_keeps_first_eight_chars() {
        assert_eq!(short_id(&FeedbackId::from("0123456789abcdef")), "01234567");
        assert_eq!(short_id(&FeedbackId::from("abc")), "abc");
    }

    #[test]
    fn format_helpers() {
        assert_eq!(format_num(0), "0");
        assert_eq!(format_num(999), "999");
        assert_eq!(format_num(1000), "1,000");
        assert_eq!(format_num(1234567), "1,234,567");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
    }

    #[test]
    fn export_writes_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut board = FeedbackBoard::open(feedback_store::MemoryStore::new());
        board.load_sample_data().unwrap();
        export(&board, Some(path.clone()), false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let restored = BoardState::import_json(&text).unwrap();
        assert_eq!(&restored, board.state());
    }

    #[test]
    fn import_then_reorder_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        let source = board_with_ids(&["first", "second"]);
        fs::write(&path, source.export_json(Utc::now()).unwrap()).unwrap();

        let mut board = FeedbackBoard::open(feedback_store::MemoryStore::new());
        import(&mut board, &path).unwrap();
        assert_eq!(board.total_feedbacks(), 2);

        assert!(reorder(&mut board, &["sec".to_string()]).is_err());
        sort(&mut board, SortBy::Manual).unwrap();
        reorder(&mut board, &["sec".to_string()]).unwrap();
        assert_eq!(board.state().feedbacks()[0].id().as_str(), "second");
    }

    #[test]
    fn import_rejects_bad_file_and_keeps_board() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"theme\":\"purple\"}").unwrap();

        let mut board = FeedbackBoard::open(feedback_store::MemoryStore::new());
        board.load_sample_data().unwrap();
        let before = board.state().clone();

        assert!(import(&mut board, &path).is_err());
        assert_eq!(board.state(), &before);
    }

    #[test]
    fn edit_requires_a_change() {
        let mut board = FeedbackBoard::open(feedback_store::MemoryStore::new());
        board.load_sample_data().unwrap();
        let id = board.state().feedbacks()[0].id().to_string();

        assert!(edit(&mut board, &id, None, None, None).is_err());
        edit(&mut board, &id, Some(" New title ".into()), None, Some(Category::Bug)).unwrap();
        let f = &board.state().feedbacks()[0];
        assert_eq!(f.title(), "New title");
        assert_eq!(f.category(), Category::Bug);
    }
}
