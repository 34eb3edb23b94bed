//! Cascade Events
//!
//! Events generated while a swap resolves, for rendering and replay. The engine
//! never waits; each event carries the named delay a caller may await before
//! showing the next one.

use serde::{Serialize, Deserialize};

use crate::core::ids::TileId;
use crate::game::gravity::Fall;
use crate::game::grid::Position;
use crate::game::tile::SpecialEffect;

/// Swap animation.
pub const SWAP_MS: u64 = 100;
/// Match highlight before removal.
pub const MATCH_MS: u64 = 120;
/// Tile fall.
pub const FALL_MS: u64 = 80;
/// New tile appearing.
pub const TILE_APPEAR_MS: u64 = 120;
/// Combo banner before the counter resets.
pub const COMBO_DISPLAY_MS: u64 = 700;

/// Stage of a pass an event belongs to.
///
/// Lower value = shown first within a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPhase {
    /// Player swap
    Swap = 0,
    /// Match groups found
    Match = 1,
    /// Removal, effects and spawns
    Clear = 2,
    /// Gravity
    Fall = 3,
    /// New tiles
    Refill = 4,
    /// Combo counter
    Combo = 5,
    /// Board-level outcome
    Board = 6,
}

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeEventData {
    /// Swap kept on the board
    Swapped { a: Position, b: Position },

    /// Swap formed no match and was undone
    SwapReverted { a: Position, b: Position },

    /// A match group was detected
    Matched {
        kind: u8,
        positions: Vec<Position>,
        special: SpecialEffect,
    },

    /// A special tile fired
    SpecialTriggered { pos: Position, effect: SpecialEffect },

    /// Cells removed this pass
    Cleared { positions: Vec<Position>, points: u64 },

    /// Obstacles destroyed by adjacency
    ObstaclesDestroyed { positions: Vec<Position> },

    /// A match spawned a special tile
    SpecialSpawned {
        pos: Position,
        id: TileId,
        kind: u8,
        special: SpecialEffect,
    },

    /// Board refresh redrew every surviving tile
    BoardRefreshed { source: Position },

    /// Tiles fell
    Dropped { drops: Vec<Fall> },

    /// Empty cells received new tiles
    Refilled { positions: Vec<Position> },

    /// Combo counter advanced
    ComboAdvanced { combo: u32 },

    /// Cascade finished
    Settled { points: u64, combo: u32 },

    /// Combo counter returns to zero after the display delay
    ComboReset,

    /// Dead board was shuffled
    Reshuffled { attempts: u32 },

    /// Reshuffle budget exhausted
    Unplayable { attempts: u32 },
}

/// A cascade event tagged with its pass and phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeEvent {
    /// Resolving pass (0 before the first pass)
    pub pass: u32,

    /// Display phase
    pub phase: EventPhase,

    /// Event data
    pub data: CascadeEventData,
}

impl CascadeEvent {
    /// Create a new event; the phase follows from the data.
    pub fn new(pass: u32, data: CascadeEventData) -> Self {
        let phase = match &data {
            CascadeEventData::Swapped { .. } | CascadeEventData::SwapReverted { .. } => EventPhase::Swap,
            CascadeEventData::Matched { .. } => EventPhase::Match,
            CascadeEventData::SpecialTriggered { .. }
            | CascadeEventData::Cleared { .. }
            | CascadeEventData::ObstaclesDestroyed { .. }
            | CascadeEventData::SpecialSpawned { .. }
            | CascadeEventData::BoardRefreshed { .. } => EventPhase::Clear,
            CascadeEventData::Dropped { .. } => EventPhase::Fall,
            CascadeEventData::Refilled { .. } => EventPhase::Refill,
            CascadeEventData::ComboAdvanced { .. }
            | CascadeEventData::Settled { .. }
            | CascadeEventData::ComboReset => EventPhase::Combo,
            CascadeEventData::Reshuffled { .. } | CascadeEventData::Unplayable { .. } => EventPhase::Board,
        };

        Self { pass, phase, data }
    }

    /// Delay (ms) a caller may await after showing this event.
    pub fn delay_ms(&self) -> u64 {
        match &self.data {
            CascadeEventData::Swapped { .. } | CascadeEventData::SwapReverted { .. } => SWAP_MS,
            CascadeEventData::Matched { .. } => MATCH_MS,
            CascadeEventData::Dropped { drops } if !drops.is_empty() => FALL_MS,
            CascadeEventData::Refilled { positions } if !positions.is_empty() => TILE_APPEAR_MS,
            CascadeEventData::Reshuffled { .. } => TILE_APPEAR_MS,
            CascadeEventData::ComboReset => COMBO_DISPLAY_MS,
            _ => 0,
        }
    }

    /// Create swapped event.
    pub fn swapped(a: Position, b: Position) -> Self {
        Self::new(0, CascadeEventData::Swapped { a, b })
    }

    /// Create swap reverted event.
    pub fn swap_reverted(a: Position, b: Position) -> Self {
        Self::new(0, CascadeEventData::SwapReverted { a, b })
    }

    /// Create settled event.
    pub fn settled(pass: u32, points: u64, combo: u32) -> Self {
        Self::new(pass, CascadeEventData::Settled { points, combo })
    }
}

/// Total delay of an event sequence.
pub fn total_delay_ms(events: &[CascadeEvent]) -> u64 {
    events.iter().map(CascadeEvent::delay_ms).sum()
}
