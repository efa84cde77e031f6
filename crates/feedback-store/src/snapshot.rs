//! The persisted form of a board.
//!
//! A snapshot is the board's JSON document plus a `version` number, stored
//! as one UTF-8 blob. Snapshots without a `version` are read as the current
//! version; snapshots from a newer version are refused.

use feedback_kit::{BoardDocument, BoardState, ExchangeError};
use serde::{Deserialize, Serialize};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Why a stored snapshot could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The blob is not UTF-8 text.
    #[error("snapshot is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    /// The text is not a valid board document.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    /// Written by a newer version of the format.
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },
}

#[derive(Serialize)]
struct Outgoing<'a> {
    version: u32,
    #[serde(flatten)]
    state: &'a BoardState,
}

#[derive(Deserialize)]
struct Incoming {
    #[serde(default)]
    version: Option<u32>,
    #[serde(flatten)]
    document: BoardDocument,
}

/// Serialize `state` into a snapshot blob.
pub fn encode(state: &BoardState) -> Result<Vec<u8>, ExchangeError> {
    let outgoing = Outgoing {
        version: SNAPSHOT_VERSION,
        state,
    };
    serde_json::to_vec(&outgoing).map_err(ExchangeError::Serialize)
}

/// Read a snapshot blob back into a board.
pub fn decode(bytes: &[u8]) -> Result<BoardState, SnapshotError> {
    let text = std::str::from_utf8(bytes)?;
    let incoming: Incoming = serde_json::from_str(text).map_err(ExchangeError::Parse)?;

    let found = incoming.version.unwrap_or(SNAPSHOT_VERSION);
    if found > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found,
            supported: SNAPSHOT_VERSION,
        });
    }

    Ok(incoming.document.into_state()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use feedback_kit::{Category, SortBy, Theme, VoteDirection};

    fn board() -> BoardState {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut board = BoardState::default();
        let id = board.add_feedback("Offline mode", "Work without network", Category::Feature, now);
        board.vote_feedback(&id, VoteDirection::Up);
        board.set_sort_by(SortBy::Popularity);
        board.set_theme(Theme::Dark);
        board
    }

    #[test]
    fn encode_writes_version_and_camel_case_keys() {
        let bytes = encode(&board()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["sortBy"], "popularity");
        assert_eq!(value["filterByCategory"], "all");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["feedbacks"][0]["userVote"], "up");
    }

    #[test]
    fn decode_reverses_encode() {
        let original = board();
        let restored = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn missing_version_reads_as_current() {
        let restored = decode(br#"{"sortBy":"category"}"#).unwrap();
        assert_eq!(restored.sort_by(), SortBy::Category);
        assert!(restored.feedbacks().is_empty());
    }

    #[test]
    fn newer_version_is_refused() {
        match decode(br#"{"version":2,"feedbacks":[]}"#) {
            Err(SnapshotError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 2);
                assert_eq!(supported, SNAPSHOT_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_is_refused() {
        assert!(matches!(
            decode(&[0xff, 0xfe, 0x00]),
            Err(SnapshotError::NotUtf8(_))
        ));
    }

    #[test]
    fn garbage_is_refused() {
        assert!(matches!(
            decode(b"{not json"),
            Err(SnapshotError::Exchange(ExchangeError::Parse(_)))
        ));
        assert!(matches!(
            decode(br#"{"theme":"neon"}"#),
            Err(SnapshotError::Exchange(ExchangeError::Parse(_)))
        ));
    }
}
