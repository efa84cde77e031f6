use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use feedback_kit::{Category, CategoryFilter, SortBy, Theme, VoteDirection};
use feedback_store::{FeedbackBoard, Inspect, RedbStore, SqliteStore};
use tracing_subscriber::EnvFilter;

mod commands;

/// feedback: a local feedback board in your terminal.
///
/// Collect feedback items, vote on them, and sort, filter, back up and
/// restore the board. State is kept in a local database file.
#[derive(Parser)]
#[command(name = "feedback", version, about, long_about = None)]
struct Cli {
    /// Path to the board database.
    #[arg(long, global = true, env = "FEEDBACK_DB", default_value = "feedback.db")]
    db: PathBuf,

    /// Storage backend for the database file.
    #[arg(long, global = true, env = "FEEDBACK_BACKEND", value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite file (WAL mode).
    Sqlite,
    /// Pure-Rust redb file.
    Redb,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
            Self::Redb => "redb",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show board totals, weekly stats, view settings and storage usage.
    Status,

    /// List items with the current filter and sort order.
    List {
        /// Print the items as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Add a feedback item. Prompts for anything not given.
    Add {
        /// Short title.
        title: Option<String>,

        /// Longer description.
        description: Option<String>,

        /// UI, Performance, Feature or Bug.
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Change the title, description or category of an item.
    Edit {
        /// Item id or a unique prefix of it.
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Delete an item.
    Delete {
        /// Item id or a unique prefix of it.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Vote an item up or down. Repeating a vote retracts it.
    Vote {
        /// Item id or a unique prefix of it.
        id: String,

        /// up or down.
        direction: VoteDirection,
    },

    /// Move the given items to the top, in the given order (manual sort only).
    Reorder {
        /// Item ids or unique prefixes.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Set the sort mode: manual, date, popularity or category.
    Sort { mode: SortBy },

    /// Show only one category, or `all`.
    Filter { category: CategoryFilter },

    /// Set the theme, or toggle it when no value is given.
    Theme { theme: Option<Theme> },

    /// Items and votes from the last seven days.
    Stats,

    /// Write a JSON backup of the board.
    Export {
        /// Output file. Defaults to feedback-backup-YYYY-MM-DD.json.
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the backup instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Replace the board with a JSON backup.
    Import {
        /// Backup file to read.
        file: PathBuf,
    },

    /// Replace all items with a set of example feedback.
    Sample,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", console::style("error:").red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(db = %cli.db.display(), backend = cli.backend.as_str(), "opening board");
    let location = commands::Location {
        path: cli.db.clone(),
        backend: cli.backend,
    };

    match cli.backend {
        Backend::Sqlite => {
            let store = SqliteStore::open(&cli.db)
                .with_context(|| format!("cannot open SQLite database {}", cli.db.display()))?;
            execute(FeedbackBoard::open(store), cli.command, &location)
        }
        Backend::Redb => {
            let store = RedbStore::open(&cli.db)
                .with_context(|| format!("cannot open redb database {}", cli.db.display()))?;
            execute(FeedbackBoard::open(store), cli.command, &location)
        }
    }
}

fn execute<S>(
    mut board: FeedbackBoard<S>,
    command: Commands,
    location: &commands::Location,
) -> anyhow::Result<()>
where
    S: Inspect,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    match command {
        Commands::Status => commands::status(&board, location),
        Commands::List { json } => commands::list(&board, json),
        Commands::Add {
            title,
            description,
            category,
        } => commands::add(&mut board, title, description, category),
        Commands::Edit {
            id,
            title,
            description,
            category,
        } => commands::edit(&mut board, &id, title, description, category),
        Commands::Delete { id, yes } => commands::delete(&mut board, &id, yes),
        Commands::Vote { id, direction } => commands::vote(&mut board, &id, direction),
        Commands::Reorder { ids } => commands::reorder(&mut board, &ids),
        Commands::Sort { mode } => commands::sort(&mut board, mode),
        Commands::Filter { category } => commands::filter(&mut board, category),
        Commands::Theme { theme } => commands::theme(&mut board, theme),
        Commands::Stats => commands::stats(&board),
        Commands::Export { output, stdout } => commands::export(&board, output, stdout),
        Commands::Import { file } => commands::import(&mut board, &file),
        Commands::Sample => commands::sample(&mut board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "feedback", "vote", "ab12", "down", "--db", "/tmp/x.redb", "--backend", "redb",
        ])
        .unwrap();
        assert_eq!(cli.backend, Backend::Redb);
        assert_eq!(cli.db, PathBuf::from("/tmp/x.redb"));
        match cli.command {
            Commands::Vote { id, direction } => {
                assert_eq!(id, "ab12");
                assert_eq!(direction, VoteDirection::Down);
            }
            _ => panic!("expected vote"),
        }
    }

    #[test]
    fn parses_domain_values() {
        let cli = Cli::try_parse_from(["feedback", "filter", "bug"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Filter { category: CategoryFilter::Only(Category::Bug) }
        ));

        let cli = Cli::try_parse_from(["feedback", "sort", "Popularity"]).unwrap();
        assert!(matches!(cli.command, Commands::Sort { mode: SortBy::Popularity }));

        let cli = Cli::try_parse_from(["feedback", "theme"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { theme: None }));

        assert!(Cli::try_parse_from(["feedback", "sort", "random"]).is_err());
        assert!(Cli::try_parse_from(["feedback", "reorder"]).is_err());
        assert!(Cli::try_parse_from(["feedback", "export", "-o", "x.json", "--stdout"]).is_err());
    }
}
