//! Grid Model
//!
//! Square matrix of optional tiles addressed by `(row, col)`, row 0 at the top.
//! Every engine transform takes a `&Grid` and returns a new `Grid`; `Clone`
//! is a full deep copy so callers can diff before/after.

use std::collections::BTreeSet;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::{compute_grid_hash, StateHash, StateHasher};
use crate::core::ids::IdSource;
use crate::game::tile::{SpecialEffect, Tile, TileKind, BASIC_KIND_COUNT};

// =============================================================================
// POSITION
// =============================================================================

/// Grid coordinate. Ordered row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, 0 at the top
    pub row: usize,
    /// Column, 0 at the left
    pub col: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance of exactly one.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// In-bounds 4-neighbours (up, down, left, right) within a `size` grid.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { row, col } = self;
        [
            row.checked_sub(1).map(|r| Position::new(r, col)),
            (row + 1 < size).then(|| Position::new(row + 1, col)),
            col.checked_sub(1).map(|c| Position::new(row, c)),
            (col + 1 < size).then(|| Position::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Grid access and shape errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Position outside `[0, size)`.
    #[error("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds {
        /// Offending position
        pos: Position,
        /// Grid side length
        size: usize,
    },

    /// Rows or columns do not form a square of the expected size.
    #[error("grid must be {expected}x{expected}, got {rows} rows with a row of {cols} cells")]
    WrongDimensions {
        /// Expected side length
        expected: usize,
        /// Rows supplied
        rows: usize,
        /// Length of the first offending row
        cols: usize,
    },

    /// A cell that must hold a tile is empty.
    #[error("cell {0} is empty")]
    EmptyCell(Position),

    /// An unknown layout code.
    #[error("cell {pos} has unknown tile code {code}")]
    InvalidCode {
        /// Offending position
        pos: Position,
        /// Code supplied
        code: u8,
    },

    /// Basic kind outside the allowed range.
    #[error("cell {pos} has kind {kind}, allowed 1..={max}")]
    InvalidKind {
        /// Offending position
        pos: Position,
        /// Kind found
        kind: u8,
        /// Largest allowed kind
        max: u8,
    },

    /// An obstacle carrying a special effect.
    #[error("obstacle at {0} carries a special effect")]
    SpecialObstacle(Position),

    /// Two cells share a tile id.
    #[error("tile id {id} appears more than once (again at {pos})")]
    DuplicateId {
        /// Repeated id
        id: String,
        /// Second occurrence
        pos: Position,
    },
}

// =============================================================================
// GRID
// =============================================================================

/// Square board of optional tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    /// Row-major cells
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an all-empty grid.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a grid from layout codes (`0` = empty, `1..=9` basic, `99` obstacle).
    ///
    /// Tiles get fresh ids in row-major order.
    pub fn from_codes<R, I>(rows: &[R], ids: &mut I) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
        I: IdSource,
    {
        let size = rows.len();
        let mut grid = Self::empty(size);

        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != size {
                return Err(GridError::WrongDimensions {
                    expected: size,
                    rows: size,
                    cols: codes.len(),
                });
            }
            for (col, &code) in codes.iter().enumerate() {
                if code == 0 {
                    continue;
                }
                let pos = Position::new(row, col);
                let kind = TileKind::from_code(code).ok_or(GridError::InvalidCode { pos, code })?;
                grid.set(pos, Some(Tile::fresh(ids, kind, SpecialEffect::None)))?;
            }
        }

        Ok(grid)
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Is the position inside the grid?
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    #[inline]
    fn index(&self, pos: Position) -> Result<usize, GridError> {
        if self.in_bounds(pos) {
            Ok(pos.row * self.size + pos.col)
        } else {
            Err(GridError::OutOfBounds { pos, size: self.size })
        }
    }

    /// Bounds-checked read of a cell.
    pub fn get(&self, pos: Position) -> Result<Option<&Tile>, GridError> {
        let index = self.index(pos)?;
        Ok(self.cells[index].as_ref())
    }

    /// Tile at `pos`, or `None` when empty or out of bounds.
    #[inline]
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.get(pos).ok().flatten()
    }

    /// Mutable tile at `pos`, or `None` when empty or out of bounds.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        let index = self.index(pos).ok()?;
        self.cells[index].as_mut()
    }

    /// Replace a cell, returning the previous occupant.
    pub fn set(&mut self, pos: Position, tile: Option<Tile>) -> Result<Option<Tile>, GridError> {
        let index = self.index(pos)?;
        Ok(std::mem::replace(&mut self.cells[index], tile))
    }

    /// Empty a cell, returning the previous occupant.
    pub fn take(&mut self, pos: Position) -> Result<Option<Tile>, GridError> {
        self.set(pos, None)
    }

    /// Exchange two cells in place.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Copy of this grid with two cells exchanged.
    pub fn swapped(&self, a: Position, b: Position) -> Result<Grid, GridError> {
        let mut next = self.clone();
        next.swap(a, b)?;
        Ok(next)
    }

    /// Kind usable for matching at `pos` (`None` for empty, obstacle, or out of bounds).
    #[inline]
    pub fn matchable_kind(&self, pos: Position) -> Option<u8> {
        self.tile(pos).and_then(Tile::matchable_kind)
    }

    /// Is there an obstacle at `pos`?
    #[inline]
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(Tile::is_obstacle)
    }

    /// All positions, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Occupied cells, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.positions()
            .zip(self.cells.iter())
            .filter_map(|(pos, cell)| cell.as_ref().map(|tile| (pos, tile)))
    }

    /// Empty cells, row-major.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// No empty cells?
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Positions of all obstacles.
    pub fn obstacle_positions(&self) -> BTreeSet<Position> {
        self.tiles()
            .filter(|(_, tile)| tile.is_obstacle())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Layout codes (`0` empty, `99` obstacle), one `Vec` per row.
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map_or(0, |tile| tile.kind.code()))
                    .collect()
            })
            .collect()
    }

    /// Check the between-moves invariants: full, kinds in range, obstacles
    /// plain, ids unique.
    pub fn validate(&self, max_kind: u8) -> Result<(), GridError> {
        if self.cells.len() != self.size * self.size {
            return Err(GridError::WrongDimensions {
                expected: self.size,
                rows: self.cells.len() / self.size.max(1),
                cols: self.size,
            });
        }

        let max = max_kind.min(BASIC_KIND_COUNT);
        let mut seen = BTreeSet::new();

        for (pos, cell) in self.positions().zip(self.cells.iter()) {
            let tile = cell.as_ref().ok_or(GridError::EmptyCell(pos))?;
            match tile.kind {
                TileKind::Basic(kind) if kind == 0 || kind > max => {
                    return Err(GridError::InvalidKind { pos, kind, max });
                }
                TileKind::Obstacle if tile.is_special() => {
                    return Err(GridError::SpecialObstacle(pos));
                }
                _ => {}
            }
            if !seen.insert(tile.id) {
                return Err(GridError::DuplicateId {
                    id: tile.id.to_string(),
                    pos,
                });
            }
        }

        Ok(())
    }

    /// Hash of the full board including tile ids.
    pub fn compute_hash(&self) -> StateHash {
        compute_grid_hash(StateHasher::for_grid(), self.size, |hasher| {
            for cell in &self.cells {
                hasher.update_bool(cell.is_some());
                if let Some(tile) = cell {
                    hasher.update_u64(tile.id.value());
                    hasher.update_u8(tile.kind.code());
                    hasher.update_u8(tile.special as u8);
                }
            }
        })
    }

    /// Hash of kinds and effects only; two grids that differ only in ids
    /// share a layout hash.
    pub fn layout_hash(&self) -> StateHash {
        compute_grid_hash(StateHasher::for_layout(), self.size, |hasher| {
            for cell in &self.cells {
                hasher.update_bool(cell.is_some());
                if let Some(tile) = cell {
                    hasher.update_u8(tile.kind.code());
                    hasher.update_u8(tile.special as u8);
                }
            }
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.codes() {
            let line: Vec<String> = row
                .iter()
                .map(|code| match *code {
                    0 => " .".to_string(),
                    99 => " #".to_string(),
                    kind => format!("{:2}", kind),
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
