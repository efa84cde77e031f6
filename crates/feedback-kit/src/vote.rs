//! Single-vote-per-user toggle rule.
//!
//! A user holds at most one vote per item. Casting the vote they already hold
//! retracts it; casting the opposite one replaces it. Rather than adjusting the
//! counter step by step, every case is spelled out in [`transition`].

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of a vote. Serialized as `"up"` / `"down"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// +1 to the item's votes.
    Up,
    /// -1 to the item's votes.
    Down,
}

impl VoteDirection {
    /// Effect of this vote on the counter.
    pub fn weight(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// The lowercase label used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "+" => Ok(Self::Up),
            "down" | "-" => Ok(Self::Down),
            other => Err(format!("unknown vote direction '{other}' (expected up or down)")),
        }
    }
}

/// Outcome of casting a vote: the user's new vote and the counter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// The user's vote after the cast; `None` when it was retracted.
    pub next: Option<VoteDirection>,
    /// Amount added to the item's `votes`.
    pub delta: i64,
}

/// Transition table for casting `cast` while holding `current`.
///
/// ```
/// use feedback_kit::{transition, VoteDirection::*};
///
/// let t = transition(Some(Down), Up);
/// assert_eq!(t.next, Some(Up));
/// assert_eq!(t.delta, 2);
/// ```
pub fn transition(current: Option<VoteDirection>, cast: VoteDirection) -> VoteTransition {
    use VoteDirection::{Down, Up};

    let (next, delta) = match (current, cast) {
        (None, Up) => (Some(Up), 1),
        (None, Down) => (Some(Down), -1),
        (Some(Up), Up) => (None, -1),
        (Some(Up), Down) => (Some(Down), -2),
        (Some(Down), Down) => (None, 1),
        (Some(Down), Up) => (Some(Up), 2),
    };

    VoteTransition { next, delta }
}
