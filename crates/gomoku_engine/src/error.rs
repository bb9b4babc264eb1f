//! Error types for the turn engine.

use crate::engine::ModeKind;
use crate::types::Mark;

/// Why a single move could not be applied to or removed from a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveFault {
    /// The move index lies outside `[0, cells)`.
    #[display("outside a board of {} cells", cells)]
    OutOfRange {
        /// Number of cells on the board.
        cells: usize,
    },

    /// The target cell already holds a mark.
    #[display("cell already holds {}", _0)]
    Occupied(Mark),

    /// The cell to clear is already empty.
    #[display("cell is already empty")]
    Vacant,
}

/// Errors surfaced by the board, the replay controller, live sessions and the
/// engine façade.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// A move was out of range or inconsistent with the board.
    #[display("Invalid move {}: {}", mv, fault)]
    InvalidMove {
        /// The offending move index.
        mv: usize,
        /// What was wrong with it.
        fault: MoveFault,
    },

    /// A record is structurally unusable (zero dimensions, too many moves).
    #[display("Invalid record: {}", _0)]
    InvalidRecord(String),

    /// The operation is not available in the engine's current mode.
    #[display("'{}' is not available in {} mode", operation, mode)]
    Mode {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Mode the engine was in.
        mode: ModeKind,
    },

    /// The remote authority could not create a game.
    #[display("Failed to create session: {}", _0)]
    SessionCreation(String),

    /// `start` was called on a session that already has an id.
    #[display("Session already started")]
    SessionAlreadyStarted,

    /// A move was submitted before the session was started.
    #[display("Session not started")]
    SessionNotStarted,

    /// The remote authority was unreachable, errored, or timed out.
    #[display("Transport error: {}", _0)]
    Transport(String),

    /// The remote authority refused the move.
    #[display("Move rejected: {}", _0)]
    MoveRejected(String),

    /// The game has already been decided.
    #[display("Session has already ended")]
    SessionTerminated,

    /// Another move is still awaiting confirmation.
    #[display("A move is already awaiting confirmation")]
    MoveInFlight,

    /// `confirm` or `rollback` was called with nothing in flight.
    #[display("No move is awaiting confirmation")]
    NoPendingMove,

    /// Every cell is already occupied.
    #[display("Board is full")]
    BoardFull,
}

impl std::error::Error for EngineError {}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
