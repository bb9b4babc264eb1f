//! Authoritative game state: move legality and n-in-a-row detection.

use gomoku_engine::{BoardState, Dimensions, GameRecord, Mark, MoveReply, Winner};
use tracing::{debug, info, instrument};

/// Player numbers as reported on the wire.
fn player_number(mark: Mark) -> u32 {
    match mark {
        Mark::X => 1,
        Mark::O => 2,
    }
}

/// Why the authority refused a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RuleViolation {
    /// The game has already finished.
    #[display("game is over")]
    GameOver,
    /// The move is off the board or on an occupied cell.
    #[display("{}", _0)]
    IllegalMove(String),
}

impl std::error::Error for RuleViolation {}

/// One game held by the server.
#[derive(Debug, Clone)]
pub struct LiveBoard {
    board: BoardState,
    moves: Vec<usize>,
    win_length: usize,
    winner: Winner,
    finished: bool,
}

impl LiveBoard {
    /// Creates an empty game; the first player moves first.
    #[instrument]
    pub fn new(dims: Dimensions, win_length: usize) -> Self {
        Self {
            board: BoardState::new(dims),
            moves: Vec::new(),
            win_length,
            winner: Winner::None,
            finished: false,
        }
    }

    /// Plays `mv` for the player to move and reports the result.
    #[instrument(skip(self), fields(turn = self.moves.len()))]
    pub fn play(&mut self, mv: usize) -> Result<MoveReply, RuleViolation> {
        if self.finished {
            return Err(RuleViolation::GameOver);
        }
        let mark = self
            .board
            .apply_move(mv, self.moves.len())
            .map_err(|e| RuleViolation::IllegalMove(e.to_string()))?;
        self.moves.push(mv);

        if let Some(line) = self.line_through(mv, mark) {
            self.winner = Winner::Player(player_number(mark));
            self.finished = true;
            info!(winner = %self.winner, turns = self.moves.len(), "Game won");
            return Ok(MoveReply::new(self.winner, true, line));
        }

        if self.board.is_full() {
            self.finished = true;
            info!(turns = self.moves.len(), "Game drawn");
            return Ok(MoveReply::new(Winner::None, true, Vec::new()));
        }

        debug!(mv, %mark, "Move accepted");
        Ok(MoveReply::ongoing())
    }

    /// Returns true once the game has a winner or the board is full.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Snapshot of the game as a record.
    pub fn to_record(&self) -> GameRecord {
        let dims = self.board.dimensions();
        GameRecord::new(
            dims.width(),
            dims.height(),
            self.moves.clone(),
            self.winner,
            self.win_length,
        )
    }

    /// Cells of a run of at least `win_length` marks through `mv`, sorted.
    fn line_through(&self, mv: usize, mark: Mark) -> Option<Vec<usize>> {
        let dims = self.board.dimensions();
        let (x, y) = dims.coords(mv);
        let directions: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dx, dy) in directions {
            let mut line = vec![mv];
            for sign in [1, -1] {
                let mut step = 1;
                while let Some(cell) = self.offset(x, y, sign * step * dx, sign * step * dy) {
                    if self.board.mark_at(cell) != Some(mark) {
                        break;
                    }
                    line.push(cell);
                    step += 1;
                }
            }
            if line.len() >= self.win_length {
                line.sort_unstable();
                return Some(line);
            }
        }
        None
    }

    fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<usize> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.board.dimensions().cell_index(nx, ny)
    }
}
