//! Mapping between linear move indices and board coordinates.
//!
//! Moves are stored row-major: `move = y * width + x`, where `x` is the
//! column and `y` the row.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Encodes a `(column, row)` pair as a move index.
///
/// The caller guarantees `x < width`; use [`Dimensions::cell_index`] for
/// unchecked input.
pub fn encode(x: usize, y: usize, width: usize) -> usize {
    y * width + x
}

/// Decodes a move index into `(column, row)`.
pub fn decode(mv: usize, width: usize) -> (usize, usize) {
    (mv % width, mv / width)
}

/// Largest board, in cells, that a record or session may describe.
pub const MAX_CELLS: usize = 1 << 20;

/// Board dimensions, fixed for the lifetime of a record or session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "RawDimensions")]
#[display("{}x{}", width, height)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

#[derive(Deserialize)]
struct RawDimensions {
    width: usize,
    height: usize,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = EngineError;

    fn try_from(raw: RawDimensions) -> EngineResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl Dimensions {
    /// Creates dimensions, rejecting empty boards and boards larger than
    /// [`MAX_CELLS`].
    pub fn new(width: usize, height: usize) -> EngineResult<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidRecord(format!(
                "board dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_CELLS => Ok(Self { width, height }),
            _ => Err(EngineError::InvalidRecord(format!(
                "board {}x{} exceeds {} cells",
                width, height, MAX_CELLS
            ))),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if `mv` names a cell on this board.
    pub fn contains(&self, mv: usize) -> bool {
        mv < self.cells()
    }

    /// Bounds-checked [`encode`].
    pub fn cell_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| encode(x, y, self.width))
    }

    /// [`decode`] using this board's width.
    pub fn coords(&self, mv: usize) -> (usize, usize) {
        decode(mv, self.width)
    }
}

impl Default for Dimensions {
    /// The 15x15 board used by the reference server.
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
        }
    }
}
