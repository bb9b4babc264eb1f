//! Shared server state: the record directory and in-memory games.

use crate::error::ServerError;
use crate::records::RecordDir;
use crate::rules::LiveBoard;
use gomoku_engine::{Dimensions, GameRecord, MoveReply, NewGame};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Games in progress, keyed by game id.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: Arc<Mutex<HashMap<String, LiveBoard>>>,
    next_id: Arc<AtomicU64>,
    dims: Dimensions,
    win_length: usize,
}

impl GameRegistry {
    /// Creates an empty registry; new games use `dims` and `win_length`.
    #[instrument]
    pub fn new(dims: Dimensions, win_length: usize) -> Self {
        Self {
            games: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            dims,
            win_length,
        }
    }

    /// Starts a new game and returns its id along with the board it uses.
    #[instrument(skip(self))]
    pub fn create(&self) -> Result<NewGame, ServerError> {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let game_id = format!("{:016x}{:08x}", nanos, seq);

        self.lock()?
            .insert(game_id.clone(), LiveBoard::new(self.dims, self.win_length));
        info!(%game_id, dims = %self.dims, win_length = self.win_length, "Created game");
        Ok(NewGame::new(game_id).with_board(self.dims, self.win_length))
    }

    /// Plays `mv` in `game_id`.
    ///
    /// Returns the reply and, when the move ended the game, the record to
    /// persist. A finished game is removed from the registry, so later moves
    /// for it are answered as unknown.
    #[instrument(skip(self))]
    pub fn play(&self, game_id: &str, mv: usize) -> Result<(MoveReply, Option<GameRecord>), ServerError> {
        let mut games = self.lock()?;
        let game = games.get_mut(game_id).ok_or_else(|| {
            warn!(game_id, "Unknown game");
            ServerError::NotFound("Game not found".to_string())
        })?;

        let reply = game
            .play(mv)
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        debug!(end = reply.end, "Move played");

        let finished = if game.is_finished() {
            let record = game.to_record();
            games.remove(game_id);
            debug!(game_id, remaining = games.len(), "Finished game released");
            Some(record)
        } else {
            None
        };
        Ok((reply, finished))
    }

    /// Number of games held.
    pub fn len(&self) -> usize {
        self.games.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns true if no game has been created.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, LiveBoard>>, ServerError> {
        self.games
            .lock()
            .map_err(|_| ServerError::Internal("game registry lock poisoned".to_string()))
    }
}

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record store.
    pub records: RecordDir,
    /// Live games.
    pub games: GameRegistry,
}
