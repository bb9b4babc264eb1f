//! Façade over replay and live play.
//!
//! The engine is always in exactly one mode, and each mode owns its own
//! board. Switching modes drops the previous controller, so a replay and a
//! live session never share state.

use crate::authority::RemoteAuthority;
use crate::board::BoardState;
use crate::codec::Dimensions;
use crate::error::{EngineError, EngineResult};
use crate::replay::ReplayController;
use crate::session::{DEFAULT_MOVE_TIMEOUT, GameSession, MoveOutcome};
use crate::types::{GameRecord, Winner};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Which controller currently drives the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ModeKind {
    /// Nothing loaded.
    Idle,
    /// Stepping through a record.
    Replay,
    /// Playing against the authority.
    Live,
}

/// The active controller.
#[derive(Debug, Clone)]
pub enum EngineMode {
    /// Nothing loaded.
    Idle,
    /// Stepping through a record.
    Replay(ReplayController),
    /// Playing against the authority.
    Live(GameSession),
}

impl EngineMode {
    /// Discriminant without the payload.
    pub fn kind(&self) -> ModeKind {
        match self {
            EngineMode::Idle => ModeKind::Idle,
            EngineMode::Replay(_) => ModeKind::Replay,
            EngineMode::Live(_) => ModeKind::Live,
        }
    }
}

/// Single entry point for the presentation layer.
#[derive(Debug)]
pub struct TurnEngine<A> {
    authority: A,
    mode: EngineMode,
    move_timeout: Duration,
}

impl<A: RemoteAuthority> TurnEngine<A> {
    /// Creates an idle engine that will play live games through `authority`.
    #[instrument(skip(authority))]
    pub fn new(authority: A) -> Self {
        Self {
            authority,
            mode: EngineMode::Idle,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
        }
    }

    /// Sets the timeout applied to every authority call in live mode.
    pub fn with_move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = timeout;
        self
    }

    /// Validates `record` and switches to replay mode at turn zero.
    ///
    /// On error the engine stays in its previous mode.
    #[instrument(skip(self, record), fields(from = %self.mode.kind()))]
    pub fn load_record(&mut self, record: GameRecord) -> EngineResult<()> {
        let replay = ReplayController::load(record)?;
        self.mode = EngineMode::Replay(replay);
        info!("Switched to replay mode");
        Ok(())
    }

    /// Creates a live game and switches to live mode.
    ///
    /// The previous controller is only discarded once the authority has
    /// created the game.
    #[instrument(skip(self), fields(from = %self.mode.kind()))]
    pub async fn start_live(&mut self, dims: Dimensions, win_length: usize) -> EngineResult<String> {
        let mut session = GameSession::new(dims, win_length).with_move_timeout(self.move_timeout);
        let game_id = session.start(&self.authority).await?;
        self.mode = EngineMode::Live(session);
        info!(%game_id, "Switched to live mode");
        Ok(game_id)
    }

    /// Drops whatever is loaded, abandoning any pending live move.
    #[instrument(skip(self), fields(from = %self.mode.kind()))]
    pub fn close(&mut self) {
        self.mode = EngineMode::Idle;
        debug!("Engine idle");
    }

    /// Steps the replay forward. See [`ReplayController::next_turn`].
    pub fn next(&mut self) -> EngineResult<bool> {
        self.replay_mut("next")?.next_turn()
    }

    /// Steps the replay back. See [`ReplayController::prev_turn`].
    pub fn prev(&mut self) -> EngineResult<bool> {
        self.replay_mut("prev")?.prev_turn()
    }

    /// Jumps the replay to `turn`. See [`ReplayController::jump_to`].
    pub fn jump_to(&mut self, turn: usize) -> EngineResult<usize> {
        self.replay_mut("jump_to")?.jump_to(turn)
    }

    /// Plays `(x, y)` in the live session.
    #[instrument(skip(self))]
    pub async fn play(&mut self, x: usize, y: usize) -> EngineResult<MoveOutcome> {
        match &mut self.mode {
            EngineMode::Live(session) => session.submit_move(&self.authority, x, y).await,
            other => Err(EngineError::Mode {
                operation: "play",
                mode: other.kind(),
            }),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    /// The active controller.
    pub fn controller(&self) -> &EngineMode {
        &self.mode
    }

    /// Board of the active controller.
    pub fn board(&self) -> Option<&BoardState> {
        match &self.mode {
            EngineMode::Idle => None,
            EngineMode::Replay(replay) => Some(replay.board()),
            EngineMode::Live(session) => Some(session.board()),
        }
    }

    /// Moves currently on the board.
    pub fn turn(&self) -> usize {
        match &self.mode {
            EngineMode::Idle => 0,
            EngineMode::Replay(replay) => replay.turn(),
            EngineMode::Live(session) => session.turn(),
        }
    }

    /// Recorded length in replay mode, moves played so far in live mode.
    pub fn total_turns(&self) -> usize {
        match &self.mode {
            EngineMode::Idle => 0,
            EngineMode::Replay(replay) => replay.total_turns(),
            EngineMode::Live(session) => session.moves().len(),
        }
    }

    /// Recorded winner, or the authority's latest verdict.
    pub fn winner(&self) -> Winner {
        match &self.mode {
            EngineMode::Idle => Winner::None,
            EngineMode::Replay(replay) => replay.record().winner(),
            EngineMode::Live(session) => session.winner(),
        }
    }

    /// The remote authority used for live games.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    fn replay_mut(&mut self, operation: &'static str) -> EngineResult<&mut ReplayController> {
        match &mut self.mode {
            EngineMode::Replay(replay) => Ok(replay),
            other => Err(EngineError::Mode {
                operation,
                mode: other.kind(),
            }),
        }
    }
}
