//! Gravity & Refill
//!
//! Gravity compacts each column downward inside the segments obstacles carve
//! out; obstacles never move and tiles never pass them. Refill then drops a
//! fresh random tile into every remaining hole.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::ids::{IdSource, TileId};
use crate::core::rng::RandomSource;
use crate::game::config::{RarityTable, BASIS_POINTS};
use crate::game::grid::{Grid, Position};
use crate::game::tile::{SpecialEffect, Tile, TileKind};

/// A tile moved by gravity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    /// Cell before the fall
    pub from: Position,
    /// Cell after the fall
    pub to: Position,
    /// Tile that moved
    pub id: TileId,
}

/// Compact every column downward.
///
/// Relative order inside a segment is preserved. Returns the new grid and the
/// moves made, bottom-up per column.
pub fn apply_gravity(grid: &Grid) -> (Grid, Vec<Fall>) {
    let size = grid.size();
    let mut next = grid.clone();
    let mut drops = Vec::new();

    for col in 0..size {
        // Tiles land on row `floor - 1`
        let mut floor = size;
        for row in (0..size).rev() {
            let from = Position::new(row, col);
            let Some(tile) = grid.tile(from) else { continue };

            if tile.is_obstacle() {
                floor = row;
                continue;
            }

            let to = Position::new(floor - 1, col);
            floor -= 1;
            if to != from {
                let moving = next.take(from).expect("column cell is in bounds");
                next.set(to, moving).expect("column cell is in bounds");
                drops.push(Fall { from, to, id: tile.id });
            }
        }
    }

    trace!(drops = drops.len(), "Applied gravity");
    (next, drops)
}

/// Draw the kind and effect of one refill tile.
///
/// Kind first (`1..=kind_count`), then one basis-point roll against the
/// rarity table.
pub fn draw_refill<R: RandomSource>(kind_count: u8, rarity: &RarityTable, rng: &mut R) -> (u8, SpecialEffect) {
    let kind = rng.next_int(u32::from(kind_count)) as u8 + 1;
    let special = rarity.effect_for_roll(rng.next_int(BASIS_POINTS));
    (kind, special)
}

/// Fill every empty cell with a fresh tile.
///
/// Returns the new grid and the filled cells, row-major.
pub fn refill<R: RandomSource, I: IdSource>(
    grid: &Grid,
    kind_count: u8,
    rarity: &RarityTable,
    rng: &mut R,
    ids: &mut I,
) -> (Grid, Vec<Position>) {
    let mut next = grid.clone();
    let filled = grid.empty_positions();

    for &pos in &filled {
        let (kind, special) = draw_refill(kind_count, rarity, rng);
        let tile = Tile::fresh(ids, TileKind::Basic(kind), special);
        if special.is_special() {
            trace!(%pos, id = %tile.id, ?special, "Refill produced special");
        }
        next.set(pos, Some(tile)).expect("empty cell is in bounds");
    }

    (next, filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;
    use crate::game::fixtures::{base_rows, grid_from, kind_five_rows, Constant};

    fn column_kinds(grid: &Grid, col: usize) -> Vec<u8> {
        (0..grid.size())
            .map(|row| grid.tile(Position::new(row, col)).map_or(0, |t| t.kind.code()))
            .collect()
    }

    #[test]
    fn test_gravity_shifts_cells_above_hole() {
        let mut grid = grid_from(&kind_five_rows());
        grid.swap(Position::new(2, 3), Position::new(2, 4)).unwrap();
        let above: Vec<_> = (1..=3)
            .map(|col| {
                (
                    grid.tile(Position::new(0, col)).unwrap().id,
                    grid.tile(Position::new(1, col)).unwrap().id,
                )
            })
            .collect();
        for col in 1..=3 {
            grid.take(Position::new(2, col)).unwrap();
        }

        let (settled, drops) = apply_gravity(&grid);
        assert_eq!(drops.len(), 6);
        assert_eq!(
            settled.empty_positions(),
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(0, 3)]
        );
        for (i, col) in (1..=3).enumerate() {
            assert_eq!(settled.tile(Position::new(1, col)).unwrap().id, above[i].0);
            assert_eq!(settled.tile(Position::new(2, col)).unwrap().id, above[i].1);
        }
        assert_eq!(settled.matchable_kind(Position::new(1, 1)), Some(2));
        assert_eq!(settled.matchable_kind(Position::new(2, 1)), Some(5));
        assert_eq!(settled.matchable_kind(Position::new(2, 3)), Some(7));
    }

    #[test]
    fn test_obstacle_partitions_column() {
        let mut rows = base_rows();
        rows[3][0] = 99;
        let mut grid = grid_from(&rows);
        grid.take(Position::new(5, 0)).unwrap();
        grid.take(Position::new(2, 0)).unwrap();
        let before = column_kinds(&grid, 0);

        let (settled, drops) = apply_gravity(&grid);
        assert!(settled.is_obstacle(Position::new(3, 0)));
        // Below the obstacle (4,0) falls into (5,0)
        assert!(settled.tile(Position::new(4, 0)).is_none());
        // Above it, two tiles compact onto rows 1-2
        assert!(settled.tile(Position::new(0, 0)).is_none());
        assert_eq!(drops.len(), 3);

        let mut above_before: Vec<u8> = before[..3].iter().copied().filter(|&k| k != 0).collect();
        let mut above_after: Vec<u8> = column_kinds(&settled, 0)[..3].iter().copied().filter(|&k| k != 0).collect();
        above_before.sort_unstable();
        above_after.sort_unstable();
        assert_eq!(above_before, above_after);
    }

    #[test]
    fn test_full_grid_does_not_move() {
        let grid = grid_from(&base_rows());
        let (settled, drops) = apply_gravity(&grid);
        assert!(drops.is_empty());
        assert_eq!(settled, grid);
    }

    #[test]
    fn test_refill_draws_kind_then_rarity() {
        let mut grid = grid_from(&base_rows());
        grid.take(Position::new(0, 0)).unwrap();

        // 5 % 9 + 1 = 6, roll 5 < 10 -> board refresh
        let mut ids = SequentialIds::starting_at(500);
        let (filled, cells) = refill(&grid, 9, &RarityTable::default(), &mut Constant(5), &mut ids);
        assert_eq!(cells, vec![Position::new(0, 0)]);
        let tile = filled.tile(Position::new(0, 0)).unwrap();
        assert_eq!(tile.kind, TileKind::Basic(6));
        assert_eq!(tile.special, SpecialEffect::BoardRefresh);
        assert_eq!(tile.id, TileId(500));

        // 9999 % 9 = 0 -> kind 1, roll 9999 -> plain
        assert_eq!(
            draw_refill(9, &RarityTable::default(), &mut Constant(9_999)),
            (1, SpecialEffect::None)
        );
    }

    #[test]
    fn test_refill_only_touches_empty_cells() {
        let mut grid = grid_from(&base_rows());
        for col in 0..6 {
            grid.take(Position::new(0, col)).unwrap();
        }
        let (filled, cells) = refill(&grid, 9, &RarityTable::none(), &mut Constant(3), &mut SequentialIds::starting_at(100));
        assert_eq!(cells.len(), 6);
        assert!(filled.is_full());
        for row in 1..6 {
            for col in 0..6 {
                let pos = Position::new(row, col);
                assert_eq!(filled.tile(pos), grid.tile(pos));
            }
        }
    }
}
