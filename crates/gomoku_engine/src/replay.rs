//! Step-through replay of a recorded game.

use crate::board::BoardState;
use crate::error::{EngineError, EngineResult};
use crate::types::{GameRecord, Mark};
use tracing::{debug, info, instrument, warn};

/// Replays a fixed move sequence forwards and backwards.
///
/// Invariant: `board` always equals the replay of `record.moves()[..turn]`.
#[derive(Debug, Clone)]
pub struct ReplayController {
    record: GameRecord,
    board: BoardState,
    turn: usize,
}

impl ReplayController {
    /// Validates `record` and positions the cursor before the first move.
    ///
    /// The whole sequence is replayed on a scratch board first, so a record
    /// that repeats a cell or leaves the board is rejected here rather than
    /// partway through navigation.
    ///
    /// # Errors
    ///
    /// `InvalidRecord` for empty or oversized dimensions or more moves than cells,
    /// `InvalidMove` for an out-of-range or repeated move.
    #[instrument(skip(record), fields(moves = record.moves().len()))]
    pub fn load(record: GameRecord) -> EngineResult<Self> {
        let dims = record.dimensions()?;
        if record.moves().len() > dims.cells() {
            warn!(cells = dims.cells(), "Record has more moves than cells");
            return Err(EngineError::InvalidRecord(format!(
                "{} moves on a {} board of {} cells",
                record.moves().len(),
                dims,
                dims.cells()
            )));
        }

        let mut scratch = BoardState::new(dims);
        for (turn, &mv) in record.moves().iter().enumerate() {
            scratch.apply_move(mv, turn).inspect_err(|e| {
                warn!(turn, mv, error = %e, "Record is corrupt");
            })?;
        }

        info!(%dims, winner = %record.winner(), "Loaded record");
        Ok(Self {
            record,
            board: BoardState::new(dims),
            turn: 0,
        })
    }

    /// Applies the next recorded move.
    ///
    /// Returns `false` without touching anything when already at the end.
    #[instrument(skip(self), fields(turn = self.turn))]
    pub fn next_turn(&mut self) -> EngineResult<bool> {
        let Some(&mv) = self.record.moves().get(self.turn) else {
            return Ok(false);
        };
        self.board.apply_move(mv, self.turn)?;
        self.turn += 1;
        debug!(turn = self.turn, "Stepped forward");
        Ok(true)
    }

    /// Undoes the most recent move.
    ///
    /// Returns `false` without touching anything when at the start.
    #[instrument(skip(self), fields(turn = self.turn))]
    pub fn prev_turn(&mut self) -> EngineResult<bool> {
        if self.turn == 0 {
            return Ok(false);
        }
        let mv = self.record.moves()[self.turn - 1];
        self.board.undo_move(mv)?;
        self.turn -= 1;
        debug!(turn = self.turn, "Stepped back");
        Ok(true)
    }

    /// Moves the cursor to `target`, clamped to `[0, total_turns]`.
    ///
    /// Steps one move at a time so the resulting board is identical to a
    /// fresh replay of `target` moves. Returns the new turn.
    #[instrument(skip(self), fields(from = self.turn))]
    pub fn jump_to(&mut self, target: usize) -> EngineResult<usize> {
        let target = target.min(self.total_turns());
        while self.turn < target {
            self.next_turn()?;
        }
        while self.turn > target {
            self.prev_turn()?;
        }
        Ok(self.turn)
    }

    /// Number of moves currently on the board.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Length of the recorded sequence.
    pub fn total_turns(&self) -> usize {
        self.record.moves().len()
    }

    /// Returns true when no move has been applied.
    pub fn is_at_start(&self) -> bool {
        self.turn == 0
    }

    /// Returns true when every recorded move has been applied.
    pub fn is_at_end(&self) -> bool {
        self.turn == self.total_turns()
    }

    /// The board at the current turn.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The loaded record.
    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    /// The most recently applied move as `((x, y), mark)`.
    pub fn last_move(&self) -> Option<((usize, usize), Mark)> {
        let idx = self.turn.checked_sub(1)?;
        let mv = self.record.moves()[idx];
        Some((self.board.dimensions().coords(mv), Mark::for_parity(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveFault;
    use crate::types::Winner;

    fn record(width: usize, height: usize, moves: Vec<usize>) -> GameRecord {
        GameRecord::new(width, height, moves, Winner::None, 3)
    }

    #[test]
    fn test_starts_at_turn_zero() {
        let replay = ReplayController::load(record(3, 3, vec![4, 0])).unwrap();
        assert_eq!(replay.turn(), 0);
        assert_eq!(replay.board().occupied_count(), 0);
        assert!(replay.is_at_start());
        assert_eq!(replay.last_move(), None);
    }

    #[test]
    fn test_repeated_cell_aborts_load() {
        let result = ReplayController::load(record(3, 3, vec![4, 0, 4]));
        assert_eq!(
            result.unwrap_err(),
            EngineError::InvalidMove {
                mv: 4,
                fault: MoveFault::Occupied(Mark::X)
            }
        );
    }

    #[test]
    fn test_out_of_range_aborts_load() {
        let result = ReplayController::load(record(3, 3, vec![1, 9]));
        assert!(matches!(
            result,
            Err(EngineError::InvalidMove {
                mv: 9,
                fault: MoveFault::OutOfRange { .. }
            })
        ));
    }

    #[test]
    fn test_too_many_moves_aborts_load() {
        let result = ReplayController::load(record(1, 2, vec![0, 1, 0]));
        assert!(matches!(result, Err(EngineError::InvalidRecord(_))));
    }

    #[test]
    fn test_zero_width_aborts_load() {
        let result = ReplayController::load(record(0, 3, vec![]));
        assert!(matches!(result, Err(EngineError::InvalidRecord(_))));
    }

    #[test]
    fn test_last_move_tracks_cursor() {
        let mut replay = ReplayController::load(record(3, 3, vec![4, 0])).unwrap();
        replay.next_turn().unwrap();
        replay.next_turn().unwrap();
        assert_eq!(replay.last_move(), Some(((0, 0), Mark::O)));
        replay.prev_turn().unwrap();
        assert_eq!(replay.last_move(), Some(((1, 1), Mark::X)));
    }

    #[test]
    fn test_jump_clamps() {
        let mut replay = ReplayController::load(record(3, 3, vec![4, 0, 8])).unwrap();
        assert_eq!(replay.jump_to(99).unwrap(), 3);
        assert!(replay.is_at_end());
        assert_eq!(replay.jump_to(0).unwrap(), 0);
        assert_eq!(replay.board().occupied_count(), 0);
    }
}
