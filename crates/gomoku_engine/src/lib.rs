//! Turn engine for n-in-a-row grid games.
//!
//! Two ways to drive a board:
//!
//! - **Replay**: load a [`GameRecord`] and step through its moves with
//!   [`ReplayController`], forwards and backwards.
//! - **Live**: play against a [`RemoteAuthority`] through a [`GameSession`],
//!   where each move is applied locally, then confirmed or rolled back.
//!
//! [`TurnEngine`] puts both behind one interface for a front end.
//!
//! # Example
//!
//! ```
//! use gomoku_engine::{GameRecord, Mark, ReplayController, Winner};
//!
//! # fn example() -> gomoku_engine::EngineResult<()> {
//! let record = GameRecord::new(3, 3, vec![4, 0, 8, 2], Winner::None, 3);
//! let mut replay = ReplayController::load(record)?;
//! while replay.next_turn()? {}
//! assert_eq!(replay.board().get(1, 1), Some(Mark::X));
//! assert_eq!(replay.board().get(2, 0), Some(Mark::O));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod authority;
mod board;
mod codec;
mod engine;
mod error;
mod replay;
mod session;
mod types;

pub use authority::{
    MoveReply, NewGame, RecordId, RecordListing, RecordStore, RemoteAuthority, RemoteError,
};
pub use board::BoardState;
pub use codec::{Dimensions, MAX_CELLS, decode, encode};
pub use engine::{EngineMode, ModeKind, TurnEngine};
pub use error::{EngineError, EngineResult, MoveFault};
pub use replay::ReplayController;
pub use session::{DEFAULT_MOVE_TIMEOUT, GameSession, MoveOutcome, PendingMove, SessionPhase};
pub use types::{GameRecord, Mark, Winner};
