//! Resolution Engine
//!
//! Expands a set of matches into the final removal set and applies it.
//!
//! The removal set is processed as a breadth-first work queue:
//! - obstacles next to a cleared cell are destroyed (never enqueued, so they
//!   don't chain),
//! - special tiles add their footprint, and newly added tiles are enqueued so
//!   chained specials fire in the same pass,
//! - a board refresh redraws every surviving tile's kind instead of clearing.
//!
//! Match spawn cells receive a fresh special tile instead of becoming empty.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::trace;

use crate::core::ids::{IdSource, TileId};
use crate::core::rng::RandomSource;
use crate::game::config::{EngineConfig, RefreshConfig};
use crate::game::grid::{Grid, Position};
use crate::game::matcher::Match;
use crate::game::tile::{SpecialEffect, Tile, TileKind};

/// A special tile created at a match spawn cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Cell that received the tile
    pub pos: Position,
    /// Fresh id
    pub id: TileId,
    /// Match kind
    pub kind: u8,
    /// Effect carried
    pub special: SpecialEffect,
}

/// Result of one resolution pass.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Grid after removal (holes left for gravity)
    pub grid: Grid,

    /// Every cell in the final removal set, spawn cells included
    pub removed: BTreeSet<Position>,

    /// Removed cells that were not spawn cells (scored)
    pub cleared: usize,

    /// Obstacles destroyed by adjacency
    pub obstacles_destroyed: BTreeSet<Position>,

    /// Effects that fired, in queue order
    pub triggered: Vec<(Position, SpecialEffect)>,

    /// Tiles created at spawn cells
    pub spawned: Vec<Spawn>,

    /// Source cell of a board refresh, if one fired
    pub refreshed: Option<Position>,
}

/// Cells covered by `effect` fired at `pos`.
///
/// Obstacles and empty cells are skipped; obstacles only fall to adjacency.
pub fn effect_footprint(grid: &Grid, pos: Position, effect: SpecialEffect, burst_radius: usize) -> Vec<Position> {
    let size = grid.size();
    let last = size.saturating_sub(1);

    let cells: Vec<Position> = match effect {
        SpecialEffect::None | SpecialEffect::BoardRefresh => Vec::new(),
        SpecialEffect::AreaBurst => {
            let rows = pos.row.saturating_sub(burst_radius)..=pos.row.saturating_add(burst_radius).min(last);
            rows.flat_map(|row| {
                let cols = pos.col.saturating_sub(burst_radius)..=pos.col.saturating_add(burst_radius).min(last);
                cols.map(move |col| Position::new(row, col))
            })
            .collect()
        }
        SpecialEffect::ColumnClear => (0..size).map(|row| Position::new(row, pos.col)).collect(),
        SpecialEffect::RowClear => (0..size).map(|col| Position::new(pos.row, col)).collect(),
        SpecialEffect::LineClear => (0..size)
            .map(|col| Position::new(pos.row, col))
            .chain((0..size).map(|row| Position::new(row, pos.col)))
            .collect(),
    };

    cells
        .into_iter()
        .filter(|&p| grid.tile(p).is_some_and(|tile| !tile.is_obstacle()))
        .collect()
}

/// Draw a replacement kind for a board refresh.
pub fn refresh_kind<R: RandomSource>(refresh: &RefreshConfig, kind_count: u8, rng: &mut R) -> u8 {
    if rng.next_int(100) < refresh.common_percent {
        refresh.common_kinds[rng.next_int(2) as usize]
    } else {
        rng.next_int(u32::from(kind_count)) as u8 + 1
    }
}

/// Resolve `matches` against `grid`.
///
/// `grid` is not modified; the returned [`Resolution`] carries the new grid.
pub fn resolve<R: RandomSource, I: IdSource>(
    grid: &Grid,
    matches: &[Match],
    config: &EngineConfig,
    kind_count: u8,
    rng: &mut R,
    ids: &mut I,
) -> Resolution {
    let size = grid.size();
    let mut removed = BTreeSet::new();
    let mut obstacles_destroyed = BTreeSet::new();
    let mut triggered = Vec::new();
    let mut refreshed = None;
    let mut queue = VecDeque::new();

    for m in matches {
        for &pos in &m.positions {
            if !grid.in_bounds(pos) {
                trace!(%pos, "Skipping out-of-bounds match cell");
                continue;
            }
            if removed.insert(pos) {
                queue.push_back(pos);
            }
        }
    }

    while let Some(pos) = queue.pop_front() {
        for neighbor in pos.neighbors(size) {
            if grid.is_obstacle(neighbor) && removed.insert(neighbor) {
                obstacles_destroyed.insert(neighbor);
            }
        }

        let Some(tile) = grid.tile(pos) else { continue };
        if !tile.is_special() {
            continue;
        }
        triggered.push((pos, tile.special));

        if tile.special == SpecialEffect::BoardRefresh {
            refreshed.get_or_insert(pos);
            continue;
        }
        for cell in effect_footprint(grid, pos, tile.special, config.burst_radius) {
            if removed.insert(cell) {
                queue.push_back(cell);
            }
        }
    }

    // First directive wins if two groups name the same cell
    let mut directives: BTreeMap<Position, (u8, SpecialEffect)> = BTreeMap::new();
    for m in matches {
        if let Some(spawn) = m.spawn.filter(|_| m.special.is_special()) {
            directives.entry(spawn).or_insert((m.kind, m.special));
        }
    }

    let mut next = grid.clone();
    let mut spawned = Vec::with_capacity(directives.len());
    for &pos in &removed {
        let replacement = directives.get(&pos).map(|&(kind, special)| {
            let tile = Tile::fresh(ids, TileKind::Basic(kind), special);
            spawned.push(Spawn { pos, id: tile.id, kind, special });
            tile
        });
        next.set(pos, replacement).expect("removal set is in bounds");
    }

    if refreshed.is_some() {
        for pos in grid.positions() {
            if removed.contains(&pos) {
                continue;
            }
            if let Some(tile) = next.tile_mut(pos).filter(|t| !t.is_obstacle()) {
                tile.kind = TileKind::Basic(refresh_kind(&config.refresh, kind_count, rng));
            }
        }
    }

    let cleared = removed.len() - spawned.len();
    trace!(
        removed = removed.len(),
        cleared,
        obstacles = obstacles_destroyed.len(),
        spawned = spawned.len(),
        refresh = refreshed.is_some(),
        "Resolved matches"
    );

    Resolution {
        grid: next,
        removed,
        cleared,
        obstacles_destroyed,
        triggered,
        spawned,
        refreshed,
    }
}
