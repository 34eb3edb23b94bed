//! Tile Definitions
//!
//! The tile entity: a kind, an optional special effect, and a stable id.

use serde::{Serialize, Deserialize};

use crate::core::ids::{IdSource, TileId};

/// Number of basic (matchable) tile kinds. Kinds are numbered `1..=9`.
pub const BASIC_KIND_COUNT: u8 = 9;

/// Layout code used for obstacles in textual board fixtures.
pub const OBSTACLE_CODE: u8 = 99;

// =============================================================================
// TILE KIND
// =============================================================================

/// What a tile is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Matchable tile of kind `1..=9`.
    Basic(u8),
    /// Immovable blocker. Never matches; destroyed only by adjacency.
    Obstacle,
}

impl TileKind {
    /// Layout code: the basic kind number, or [`OBSTACLE_CODE`].
    pub fn code(self) -> u8 {
        match self {
            TileKind::Basic(kind) => kind,
            TileKind::Obstacle => OBSTACLE_CODE,
        }
    }

    /// Parse a layout code. `0` and unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            OBSTACLE_CODE => Some(TileKind::Obstacle),
            1..=BASIC_KIND_COUNT => Some(TileKind::Basic(code)),
            _ => None,
        }
    }

    /// Basic kind number, if matchable.
    #[inline]
    pub fn basic(self) -> Option<u8> {
        match self {
            TileKind::Basic(kind) => Some(kind),
            TileKind::Obstacle => None,
        }
    }
}

// =============================================================================
// SPECIAL EFFECT
// =============================================================================

/// Effect a special tile applies when it is part of a removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SpecialEffect {
    /// Plain tile
    #[default]
    None = 0,
    /// Clears a square window around the tile
    AreaBurst = 1,
    /// Clears the tile's column
    ColumnClear = 2,
    /// Clears the tile's row
    RowClear = 3,
    /// Clears the tile's row and column (cross)
    LineClear = 4,
    /// Redraws the kind of every other tile on the board
    BoardRefresh = 5,
}

impl SpecialEffect {
    /// Is this an actual effect?
    #[inline]
    pub fn is_special(self) -> bool {
        self != SpecialEffect::None
    }
}

// =============================================================================
// TILE
// =============================================================================

/// A single tile on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Stable identity
    pub id: TileId,

    /// Kind of tile
    pub kind: TileKind,

    /// Special effect carried (always `None` for obstacles)
    pub special: SpecialEffect,
}

impl Tile {
    /// Plain basic tile.
    pub fn basic(id: TileId, kind: u8) -> Self {
        debug_assert!((1..=BASIC_KIND_COUNT).contains(&kind), "kind {} out of range", kind);
        Self {
            id,
            kind: TileKind::Basic(kind),
            special: SpecialEffect::None,
        }
    }

    /// Basic tile carrying a special effect.
    pub fn with_special(id: TileId, kind: u8, special: SpecialEffect) -> Self {
        Self {
            special,
            ..Self::basic(id, kind)
        }
    }

    /// Obstacle tile.
    pub fn obstacle(id: TileId) -> Self {
        Self {
            id,
            kind: TileKind::Obstacle,
            special: SpecialEffect::None,
        }
    }

    /// Allocate a fresh tile from an id source.
    pub fn fresh<I: IdSource>(ids: &mut I, kind: TileKind, special: SpecialEffect) -> Self {
        let id = ids.next_id();
        match kind {
            TileKind::Basic(kind) => Self::with_special(id, kind, special),
            TileKind::Obstacle => Self::obstacle(id),
        }
    }

    /// Is this tile an obstacle?
    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.kind == TileKind::Obstacle
    }

    /// Does this tile carry an effect?
    #[inline]
    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }

    /// Kind used for matching (`None` for obstacles).
    #[inline]
    pub fn matchable_kind(&self) -> Option<u8> {
        self.kind.basic()
    }
}
