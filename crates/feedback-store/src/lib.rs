//! # feedback-store
//!
//! Persistence for [`feedback-kit`](https://docs.rs/feedback-kit) boards.
//!
//! A [`StateStore`] is a namespaced key-value port over opaque bytes.
//! [`FeedbackBoard`] sits on top of one, restores the board from a single
//! slot when opened, and writes the whole snapshot back after every change.
//!
//! ## Quick Start
//!
//! ```
//! use feedback_kit::Category;
//! use feedback_store::{FeedbackBoard, MemoryStore, StateStore};
//!
//! let mut board = FeedbackBoard::open(MemoryStore::new());
//! board.add_feedback("Keyboard shortcuts", "For power users", Category::Feature).unwrap();
//!
//! let store = board.into_store();
//! assert!(store.exists("feedback", "feedback-store").unwrap());
//! ```
//!
//! ## Backends
//!
//! | Backend | Feature flag | Use case |
//! |---------|-------------|----------|
//! | [`MemoryStore`] | *(always available)* | Tests, throwaway boards |
//! | `SqliteStore` | `sqlite` | Default on-disk store |
//! | `RedbStore` | `redb` | Pure-Rust builds without C deps |

#![warn(missing_docs)]

mod board;
mod memory;
#[cfg(feature = "redb")]
mod redb;
mod snapshot;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

pub use board::{
    BoardBuilder, BoardConfig, BoardError, FeedbackBoard, DEFAULT_KEY, DEFAULT_NAMESPACE,
};
pub use memory::{MemoryError, MemoryStore};
#[cfg(feature = "redb")]
pub use redb::{RedbError, RedbStore};
pub use snapshot::{SnapshotError, SNAPSHOT_VERSION};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteError, SqliteStore};
pub use traits::*;
