//! Live play against a remote authority.
//!
//! Moves are submitted in two phases: the move is applied to the local board
//! tentatively, then the authority either confirms it (commit) or the local
//! change is undone (rollback). Only one move may be tentative at a time.

use crate::authority::{MoveReply, NewGame, RemoteAuthority, RemoteError};
use crate::board::BoardState;
use crate::codec::Dimensions;
use crate::error::{EngineError, EngineResult, MoveFault};
use crate::types::{Mark, Winner};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// How long a move may wait for the authority before it is rolled back.
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifecycle of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    /// No game has been created yet.
    NotStarted,
    /// Moves are being accepted.
    Active,
    /// The game is decided; no more moves.
    Terminal,
}

/// Result of a confirmed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Play continues.
    Continue,
    /// The move decided the game.
    Won {
        /// Winning player as reported by the authority.
        winner: Winner,
        /// Cells forming the winning line, if reported.
        winning_line: Vec<usize>,
    },
    /// The game ended without a winner.
    Draw,
}

/// A move applied locally and awaiting the authority's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    /// Encoded move index.
    pub mv: usize,
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Mark placed for this move.
    pub mark: Mark,
}

/// One live game.
///
/// `moves`, `board` and `turn` include the pending move, if any; the last
/// confirmed state is always recoverable by rolling it back.
#[derive(Debug, Clone)]
pub struct GameSession {
    session_id: Option<String>,
    board: BoardState,
    moves: Vec<usize>,
    win_length: usize,
    winner: Winner,
    winning_line: Vec<usize>,
    phase: SessionPhase,
    pending: Option<PendingMove>,
    move_timeout: Duration,
}

impl GameSession {
    /// Creates a session that has not yet contacted the authority.
    #[instrument]
    pub fn new(dims: Dimensions, win_length: usize) -> Self {
        Self {
            session_id: None,
            board: BoardState::new(dims),
            moves: Vec::new(),
            win_length,
            winner: Winner::None,
            winning_line: Vec::new(),
            phase: SessionPhase::NotStarted,
            pending: None,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
        }
    }

    /// Sets how long a submission may wait for the authority.
    pub fn with_move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = timeout;
        self
    }

    /// Asks the authority for a new game and activates the session.
    ///
    /// # Errors
    ///
    /// `SessionAlreadyStarted` if called twice, `SessionCreation` if the
    /// authority fails, does not answer within the move timeout, or reports
    /// an unusable board.
    ///
    /// When the authority reports its board size and win length, the session
    /// adopts them in place of the ones it was created with.
    #[instrument(skip(self, authority))]
    pub async fn start<A>(&mut self, authority: &A) -> EngineResult<String>
    where
        A: RemoteAuthority + ?Sized,
    {
        if self.phase != SessionPhase::NotStarted {
            warn!(phase = %self.phase, "Session already started");
            return Err(EngineError::SessionAlreadyStarted);
        }

        let created = match tokio::time::timeout(self.move_timeout, authority.create_game()).await {
            Ok(Ok(created)) => created,
            Ok(Err(e)) => {
                error!(error = %e, "Authority failed to create game");
                return Err(EngineError::SessionCreation(e.to_string()));
            }
            Err(_) => {
                error!(timeout = ?self.move_timeout, "Game creation timed out");
                return Err(EngineError::SessionCreation(format!(
                    "no reply within {:?}",
                    self.move_timeout
                )));
            }
        };

        self.adopt_board(&created)?;
        info!(game_id = %created.game_id, dims = %self.board.dimensions(), "Session started");
        self.session_id = Some(created.game_id.clone());
        self.phase = SessionPhase::Active;
        Ok(created.game_id)
    }

    /// Plays `(x, y)`: applies it locally, asks the authority, then commits
    /// or rolls back.
    ///
    /// # Errors
    ///
    /// Precondition failures from [`begin_move`](Self::begin_move) leave the
    /// session untouched. `MoveRejected` and `Transport` (including timeouts)
    /// are returned after the tentative move has been rolled back.
    ///
    /// Dropping the future before it completes also rolls the tentative move
    /// back, so an abandoned submission never blocks the next one.
    #[instrument(skip(self, authority), fields(session_id = ?self.session_id, turn = self.turn()))]
    pub async fn submit_move<A>(&mut self, authority: &A, x: usize, y: usize) -> EngineResult<MoveOutcome>
    where
        A: RemoteAuthority + ?Sized,
    {
        let game_id = self.session_id.clone().ok_or(EngineError::SessionNotStarted)?;
        let pending = self.begin_move(x, y)?;
        let timeout = self.move_timeout;

        let mut guard = PendingGuard {
            session: self,
            armed: true,
        };
        let verdict = tokio::time::timeout(timeout, authority.submit_move(&game_id, pending.mv)).await;
        guard.armed = false;
        let session = &mut *guard.session;

        match verdict {
            Ok(Ok(reply)) => session.confirm(reply),
            Ok(Err(remote)) => {
                session.rollback()?;
                Err(match remote {
                    RemoteError::Rejected(msg) | RemoteError::NotFound(msg) => {
                        warn!(mv = pending.mv, reason = %msg, "Authority rejected move");
                        EngineError::MoveRejected(msg)
                    }
                    RemoteError::Transport(msg) => {
                        error!(mv = pending.mv, error = %msg, "Move submission failed");
                        EngineError::Transport(msg)
                    }
                })
            }
            Err(_) => {
                session.rollback()?;
                error!(mv = pending.mv, ?timeout, "Move submission timed out");
                Err(EngineError::Transport(format!("no reply within {:?}", timeout)))
            }
        }
    }

    /// First phase: validates local preconditions and applies the move
    /// tentatively.
    ///
    /// # Errors
    ///
    /// `SessionNotStarted`, `SessionTerminated`, `MoveInFlight`, `BoardFull`,
    /// or `InvalidMove` for off-board or locally occupied cells. Nothing is
    /// mutated on error.
    #[instrument(skip(self), fields(turn = self.turn()))]
    pub fn begin_move(&mut self, x: usize, y: usize) -> EngineResult<PendingMove> {
        match self.phase {
            SessionPhase::NotStarted => return Err(EngineError::SessionNotStarted),
            SessionPhase::Terminal => return Err(EngineError::SessionTerminated),
            SessionPhase::Active => {}
        }
        if self.pending.is_some() {
            warn!("Move submitted while another is awaiting confirmation");
            return Err(EngineError::MoveInFlight);
        }

        let dims = self.board.dimensions();
        if self.moves.len() >= dims.cells() {
            return Err(EngineError::BoardFull);
        }
        let mv = dims.cell_index(x, y).ok_or(EngineError::InvalidMove {
            mv: x.saturating_add(y.saturating_mul(dims.width())),
            fault: MoveFault::OutOfRange { cells: dims.cells() },
        })?;

        let mark = self.board.apply_move(mv, self.moves.len())?;
        self.moves.push(mv);
        let pending = PendingMove { mv, x, y, mark };
        self.pending = Some(pending);
        debug!(mv, %mark, turn = self.turn(), "Move applied tentatively");
        Ok(pending)
    }

    /// Second phase, success: commits the pending move and records the
    /// authority's verdict.
    #[instrument(skip(self, reply), fields(winner = %reply.winner, end = reply.end))]
    pub fn confirm(&mut self, reply: MoveReply) -> EngineResult<MoveOutcome> {
        let pending = self.pending.take().ok_or(EngineError::NoPendingMove)?;
        self.winner = reply.winner;

        let outcome = if reply.winner.is_decided() {
            self.winning_line = reply.winning_line;
            MoveOutcome::Won {
                winner: reply.winner,
                winning_line: self.winning_line.clone(),
            }
        } else if reply.end || self.board.is_full() {
            MoveOutcome::Draw
        } else {
            MoveOutcome::Continue
        };

        if outcome != MoveOutcome::Continue {
            self.phase = SessionPhase::Terminal;
            info!(mv = pending.mv, winner = %self.winner, turns = self.moves.len(), "Session finished");
        } else {
            debug!(mv = pending.mv, turn = self.turn(), "Move confirmed");
        }
        Ok(outcome)
    }

    /// Second phase, failure: undoes the pending move.
    #[instrument(skip(self))]
    pub fn rollback(&mut self) -> EngineResult<PendingMove> {
        let pending = self.pending.take().ok_or(EngineError::NoPendingMove)?;
        self.board.undo_move(pending.mv)?;
        self.moves.pop();
        debug!(mv = pending.mv, turn = self.turn(), "Tentative move rolled back");
        Ok(pending)
    }

    /// Abandons the session locally, including any pending move.
    #[instrument(skip(self), fields(session_id = ?self.session_id))]
    pub fn reset(&mut self) {
        info!("Session reset");
        let dims = self.board.dimensions();
        *self = Self::new(dims, self.win_length).with_move_timeout(self.move_timeout);
    }

    /// Resizes the empty board to what the authority reports, if anything.
    fn adopt_board(&mut self, created: &NewGame) -> EngineResult<()> {
        if let (Some(width), Some(height)) = (created.width, created.height) {
            let dims = Dimensions::new(width, height)
                .map_err(|e| EngineError::SessionCreation(format!("authority board: {}", e)))?;
            if dims != self.board.dimensions() {
                info!(requested = %self.board.dimensions(), authority = %dims, "Using the authority's board size");
                self.board = BoardState::new(dims);
            }
        }
        if let Some(win_length) = created.n_in_a_row {
            self.win_length = win_length;
        }
        Ok(())
    }

    /// Authority-assigned identifier, once started.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Moves on the board, including a pending one.
    pub fn turn(&self) -> usize {
        self.moves.len()
    }

    /// Moves the authority has confirmed.
    pub fn confirmed_turn(&self) -> usize {
        self.moves.len() - usize::from(self.pending.is_some())
    }

    /// The tentative move, if one is awaiting confirmation.
    pub fn pending(&self) -> Option<PendingMove> {
        self.pending
    }

    /// Move sequence so far.
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    /// Local board.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Last winner reported by the authority.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Winning line reported by the authority.
    pub fn winning_line(&self) -> &[usize] {
        &self.winning_line
    }

    /// Marks in a row needed to win.
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Mark that the next move will place.
    pub fn to_move(&self) -> Mark {
        Mark::for_parity(self.moves.len())
    }
}

/// Rolls back the pending move if dropped while still armed, which happens
/// when a caller abandons [`GameSession::submit_move`] mid-flight.
struct PendingGuard<'a> {
    session: &'a mut GameSession,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.session.rollback() {
            Ok(pending) => warn!(mv = pending.mv, "Submission abandoned, tentative move rolled back"),
            Err(e) => error!(error = %e, "Could not roll back abandoned move"),
        }
    }
}
