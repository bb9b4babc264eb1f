//! The two collaborators the engine talks to: the record store and the
//! remote game authority.
//!
//! Both are async traits so the engine can be driven by an HTTP client in
//! production and a scripted double in tests.

use crate::codec::Dimensions;
use crate::types::{GameRecord, Winner};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier.
///
/// By convention a decimal epoch-seconds timestamp followed by an extension
/// (`1717171717.json`), with `_<n>` before the extension when several records
/// share a second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Borrows the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Time encoded in the identifier, if it follows the epoch convention.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.stamp().parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Position among records saved in the same second: `0` for
    /// `<epoch>.json`, `n` for `<epoch>_<n>.json`.
    pub fn collision_index(&self) -> usize {
        let stem = self.0.split('.').next().unwrap_or_default();
        stem.split_once('_')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(0)
    }

    fn stamp(&self) -> &str {
        let stem = self.0.split('.').next().unwrap_or_default();
        stem.split('_').next().unwrap_or_default()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Body of the record listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordListing {
    /// Identifiers, oldest first.
    pub items: Vec<RecordId>,
}

/// Reply to a game creation request.
///
/// Authorities that report their board size let the session size its local
/// board to match; the board fields are optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    /// Identifier for subsequent moves.
    pub game_id: String,
    /// Board width used by the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Board height used by the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    /// Marks in a row the authority requires to win.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_in_a_row: Option<usize>,
}

impl NewGame {
    /// Reply carrying only an identifier.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            width: None,
            height: None,
            n_in_a_row: None,
        }
    }

    /// Adds the authority's board size and win length.
    pub fn with_board(mut self, dims: Dimensions, win_length: usize) -> Self {
        self.width = Some(dims.width());
        self.height = Some(dims.height());
        self.n_in_a_row = Some(win_length);
        self
    }
}

/// Authoritative reply to a submitted move.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_new::new)]
pub struct MoveReply {
    /// Winner after this move; `-1` on the wire while undecided.
    pub winner: Winner,
    /// True when the game is over, including draws.
    #[serde(default)]
    pub end: bool,
    /// Move indices forming the winning line, when there is one.
    #[serde(default)]
    pub winning_line: Vec<usize>,
}

impl MoveReply {
    /// Reply for a move that leaves the game undecided.
    pub fn ongoing() -> Self {
        Self::default()
    }
}

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RemoteError {
    /// Network failure, server error, or unreadable reply.
    #[display("transport failure: {}", _0)]
    Transport(String),

    /// The collaborator understood the request and refused it.
    #[display("rejected: {}", _0)]
    Rejected(String),

    /// The requested record or game does not exist.
    #[display("not found: {}", _0)]
    NotFound(String),
}

impl std::error::Error for RemoteError {}

/// Source of recorded games.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists record identifiers, oldest first.
    async fn list_records(&self) -> Result<Vec<RecordId>, RemoteError>;

    /// Fetches one record.
    async fn fetch_record(&self, id: &RecordId) -> Result<GameRecord, RemoteError>;
}

/// Remote source of truth for live games.
#[async_trait::async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Creates a new game.
    async fn create_game(&self) -> Result<NewGame, RemoteError>;

    /// Submits `mv` for the player to move in `game_id`.
    async fn submit_move(&self, game_id: &str, mv: usize) -> Result<MoveReply, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_timestamp() {
        let id = RecordId::from("1700000000.json");
        let at = id.recorded_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(RecordId::from("notes.json").recorded_at(), None);

        let again = RecordId::from("1700000000_3.json");
        assert_eq!(again.recorded_at(), Some(at));
        assert_eq!(again.collision_index(), 3);
        assert_eq!(id.collision_index(), 0);
    }

    #[test]
    fn test_record_ids_sort_by_recency() {
        let mut ids = vec![RecordId::from("1700000200.json"), RecordId::from("1700000100.json")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "1700000100.json");
    }

    #[test]
    fn test_new_game_board_is_optional() {
        let bare: NewGame = serde_json::from_str(r#"{"game_id":"abc"}"#).unwrap();
        assert_eq!(bare, NewGame::new("abc"));

        let sized: NewGame =
            serde_json::from_str(r#"{"game_id":"abc","width":7,"height":6,"n_in_a_row":4}"#).unwrap();
        assert_eq!(sized, NewGame::new("abc").with_board(Dimensions::new(7, 6).unwrap(), 4));
    }

    #[test]
    fn test_move_reply_defaults() {
        let reply: MoveReply = serde_json::from_str(r#"{"winner":-1}"#).unwrap();
        assert_eq!(reply, MoveReply::ongoing());

        let reply: MoveReply =
            serde_json::from_str(r#"{"end":true,"winner":1,"winning_line":[0,1,2]}"#).unwrap();
        assert_eq!(reply, MoveReply::new(Winner::Player(1), true, vec![0, 1, 2]));
    }
}
