//! Board Setup
//!
//! Initial board generation and dead-board reshuffles.

use tracing::{debug, trace};

use crate::core::ids::IdSource;
use crate::core::rng::RandomSource;
use crate::game::grid::{Grid, Position};
use crate::game::hint::is_board_playable;
use crate::game::level::LevelConfig;
use crate::game::matcher::{has_match, would_create_match};
use crate::game::tile::{SpecialEffect, Tile, TileKind};

/// Redraws per cell before accepting a kind that completes a run.
pub const MAX_GENERATION_ATTEMPTS: u32 = 100;

/// Generate a starting board for `level`.
///
/// Cells fill row-major. Obstacles come from the level mask; every other cell
/// draws a plain tile, redrawing while the kind would complete a run with the
/// cells already placed.
pub fn generate_grid<R: RandomSource, I: IdSource>(level: &LevelConfig, rng: &mut R, ids: &mut I) -> Grid {
    let size = level.grid_size;
    let kinds = u32::from(level.tile_kind_count);
    let mut grid = Grid::empty(size);

    for row in 0..size {
        for col in 0..size {
            let pos = Position::new(row, col);
            let tile = if level.is_obstacle(pos) {
                Tile::fresh(ids, TileKind::Obstacle, SpecialEffect::None)
            } else {
                let mut kind = rng.next_int(kinds) as u8 + 1;
                let mut attempts = 1;
                while attempts < MAX_GENERATION_ATTEMPTS
                    && would_create_match(&grid, pos, kind, level.min_match_length)
                {
                    kind = rng.next_int(kinds) as u8 + 1;
                    attempts += 1;
                }
                Tile::fresh(ids, TileKind::Basic(kind), SpecialEffect::None)
            };
            grid.set(pos, Some(tile)).expect("generated cell is in bounds");
        }
    }

    debug!(size, obstacles = level.obstacle_count(), "Generated board");
    grid
}

/// Full, match-free and with at least one legal move.
pub fn is_ready(grid: &Grid, min_len: usize) -> bool {
    grid.is_full() && !has_match(grid, min_len) && is_board_playable(grid, min_len)
}

/// Permute every non-obstacle tile; obstacles stay fixed. Ids travel with
/// their tiles.
pub fn shuffle_tiles<R: RandomSource>(grid: &Grid, rng: &mut R) -> Grid {
    let slots: Vec<Position> = grid
        .tiles()
        .filter(|(_, tile)| !tile.is_obstacle())
        .map(|(pos, _)| pos)
        .collect();
    let mut tiles: Vec<Tile> = slots.iter().filter_map(|&pos| grid.tile(pos).cloned()).collect();
    rng.shuffle(&mut tiles);

    let mut next = grid.clone();
    for (pos, tile) in slots.into_iter().zip(tiles) {
        next.set(pos, Some(tile)).expect("tile slot is in bounds");
    }
    next
}

/// Result of a reshuffle.
#[derive(Clone, Debug)]
pub enum Reshuffle {
    /// A candidate passed; `attempts` includes the successful one
    Ready {
        /// New board
        grid: Grid,
        /// Shuffles tried
        attempts: u32,
    },
    /// Every candidate failed
    Exhausted {
        /// Shuffles tried
        attempts: u32,
    },
}

/// Shuffle until the board is ready, at most `max_attempts` times.
pub fn reshuffle<R: RandomSource>(grid: &Grid, min_len: usize, max_attempts: u32, rng: &mut R) -> Reshuffle {
    for attempt in 1..=max_attempts {
        let candidate = shuffle_tiles(grid, rng);
        if is_ready(&candidate, min_len) {
            return Reshuffle::Ready { grid: candidate, attempts: attempt };
        }
        trace!(attempt, "Reshuffle candidate rejected");
    }
    Reshuffle::Exhausted { attempts: max_attempts }
}
