//! Board occupancy.

use crate::codec::Dimensions;
use crate::error::{EngineError, EngineResult, MoveFault};
use crate::types::Mark;
use tracing::{instrument, trace};

/// Occupancy grid for one record or one live session.
///
/// Cells are stored flat, indexed by move index, so a move never needs to be
/// decoded to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    dims: Dimensions,
    cells: Vec<Option<Mark>>,
    occupied: usize,
}

impl BoardState {
    /// Creates an empty board.
    #[instrument]
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![None; dims.cells()],
            occupied: 0,
        }
    }

    /// Board dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Places the mark for `parity` on the cell named by `mv`.
    ///
    /// # Errors
    ///
    /// `InvalidMove` if `mv` is off the board or the cell is occupied. The
    /// board is left untouched on error.
    #[instrument(skip(self), fields(dims = %self.dims))]
    pub fn apply_move(&mut self, mv: usize, parity: usize) -> EngineResult<Mark> {
        let cell = self.cell_mut(mv)?;
        if let Some(existing) = *cell {
            return Err(EngineError::InvalidMove {
                mv,
                fault: MoveFault::Occupied(existing),
            });
        }

        let mark = Mark::for_parity(parity);
        *cell = Some(mark);
        self.occupied += 1;
        trace!(mv, %mark, "Applied move");
        Ok(mark)
    }

    /// Clears the cell named by `mv`, returning the mark that was there.
    ///
    /// # Errors
    ///
    /// `InvalidMove` if `mv` is off the board or the cell is already empty.
    #[instrument(skip(self), fields(dims = %self.dims))]
    pub fn undo_move(&mut self, mv: usize) -> EngineResult<Mark> {
        let cell = self.cell_mut(mv)?;
        let mark = cell.take().ok_or(EngineError::InvalidMove {
            mv,
            fault: MoveFault::Vacant,
        })?;
        self.occupied -= 1;
        trace!(mv, %mark, "Undid move");
        Ok(mark)
    }

    /// Mark at column `x`, row `y`. Off-board coordinates read as empty.
    pub fn get(&self, x: usize, y: usize) -> Option<Mark> {
        self.dims
            .cell_index(x, y)
            .and_then(|mv| self.mark_at(mv))
    }

    /// Mark at a move index.
    pub fn mark_at(&self, mv: usize) -> Option<Mark> {
        self.cells.get(mv).copied().flatten()
    }

    /// Returns true if `mv` is on the board and empty.
    pub fn is_vacant(&self, mv: usize) -> bool {
        matches!(self.cells.get(mv), Some(None))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Returns true when every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// Iterates over occupied cells as `((x, y), mark)`.
    pub fn marks(&self) -> impl Iterator<Item = ((usize, usize), Mark)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(mv, cell)| cell.map(|mark| (self.dims.coords(mv), mark)))
    }

    /// Formats the board as a text grid, one row per line, `.` for empty.
    pub fn render(&self) -> String {
        let width = self.dims.width();
        let mut out = String::with_capacity((width * 2 + 1) * self.dims.height());
        for row in self.cells.chunks(width) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |m| m.to_string()))
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    fn cell_mut(&mut self, mv: usize) -> EngineResult<&mut Option<Mark>> {
        let cells = self.cells.len();
        self.cells.get_mut(mv).ok_or(EngineError::InvalidMove {
            mv,
            fault: MoveFault::OutOfRange { cells },
        })
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
