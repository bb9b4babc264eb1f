//! Core domain types: marks, winners and game records.

use crate::codec::Dimensions;
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Mark {
    /// First player (even sequence positions).
    #[display("X")]
    X,
    /// Second player (odd sequence positions).
    #[display("O")]
    O,
}

impl Mark {
    /// Mark for the move at the given parity (`0` is first, `1` is second).
    ///
    /// Any value is accepted; only its parity matters, so a turn index can be
    /// passed directly.
    pub fn for_parity(parity: usize) -> Self {
        if parity % 2 == 0 { Mark::X } else { Mark::O }
    }

    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Winner of a game as reported by a record or the remote authority.
///
/// On the wire this is a plain integer where `-1` (or any negative value)
/// means nobody has won, either because play continues or it was a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Winner {
    /// No winner yet, or a draw.
    #[default]
    None,
    /// Player index of the winner.
    Player(u32),
}

impl Winner {
    /// Returns true if a player has won.
    pub fn is_decided(&self) -> bool {
        matches!(self, Winner::Player(_))
    }
}

impl From<i64> for Winner {
    fn from(value: i64) -> Self {
        u32::try_from(value).map_or(Winner::None, Winner::Player)
    }
}

impl From<Winner> for i64 {
    fn from(value: Winner) -> Self {
        match value {
            Winner::None => -1,
            Winner::Player(p) => i64::from(p),
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::None => write!(f, "none"),
            Winner::Player(p) => write!(f, "player {}", p),
        }
    }
}

/// A finished or abandoned game as stored by the record store.
///
/// Immutable once loaded. Serialises to
/// `{ width, height, moves, winner, n_in_a_row }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    width: usize,
    height: usize,
    moves: Vec<usize>,
    #[serde(default)]
    winner: Winner,
    #[serde(rename = "n_in_a_row")]
    win_length: usize,
}

impl GameRecord {
    /// Creates a record.
    pub fn new(
        width: usize,
        height: usize,
        moves: Vec<usize>,
        winner: Winner,
        win_length: usize,
    ) -> Self {
        Self {
            width,
            height,
            moves,
            winner,
            win_length,
        }
    }

    /// Parses a record from its JSON form.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidRecord(format!("malformed record JSON: {}", e)))
    }

    /// Serialises the record to JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self)
            .map_err(|e| EngineError::InvalidRecord(format!("unserialisable record: {}", e)))
    }

    /// Validated board dimensions.
    pub fn dimensions(&self) -> EngineResult<Dimensions> {
        Dimensions::new(self.width, self.height)
    }

    /// Ordered move sequence.
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    /// Recorded winner.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Number of marks in a row needed to win.
    pub fn win_length(&self) -> usize {
        self.win_length
    }
}
