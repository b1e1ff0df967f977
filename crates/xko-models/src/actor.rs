//! Player identities.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which player an observation is attributed to.
///
/// Player 1 is the character on the left half of the screen, player 2 the one
/// on the right. Attribution is a motion heuristic, so `Unknown` is a normal
/// outcome rather than an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player1,
    Player2,
    Unknown,
}

impl Actor {
    /// Both resolvable players, in report order.
    pub const PLAYERS: [Actor; 2] = [Actor::Player1, Actor::Player2];

    /// The other player. `Unknown` has no opponent and maps to itself.
    pub fn opponent(self) -> Actor {
        match self {
            Actor::Player1 => Actor::Player2,
            Actor::Player2 => Actor::Player1,
            Actor::Unknown => Actor::Unknown,
        }
    }

    /// Whether this is one of the two players.
    pub fn is_player(self) -> bool {
        !matches!(self, Actor::Unknown)
    }

    /// Human-readable label ("Player 1").
    pub fn display_name(self) -> &'static str {
        match self {
            Actor::Player1 => "Player 1",
            Actor::Player2 => "Player 2",
            Actor::Unknown => "Unknown",
        }
    }

    /// Identifier used in file names and JSON ("player1").
    pub fn as_str(self) -> &'static str {
        match self {
            Actor::Player1 => "player1",
            Actor::Player2 => "player2",
            Actor::Unknown => "unknown",
        }
    }

    /// Slot index for per-player arrays. `None` for `Unknown`.
    pub fn index(self) -> Option<usize> {
        match self {
            Actor::Player1 => Some(0),
            Actor::Player2 => Some(1),
            Actor::Unknown => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is ahead on net damage at a point in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Leader {
    Player1,
    Player2,
    Tied,
}
