//! Hint search: exhaustive adjacent-pair trial.

use crate::game::grid::{Grid, Position};
use crate::game::matcher::has_match;

/// First swap that produces a match, or `None` when no legal move exists.
///
/// Cells are visited row-major; each tries its right neighbour, then the one
/// below. Obstacles and empty cells are never swapped.
pub fn find_hint(grid: &Grid, min_len: usize) -> Option<(Position, Position)> {
    let size = grid.size();
    let movable = |pos: Position| grid.tile(pos).is_some_and(|tile| !tile.is_obstacle());

    for pos in grid.positions() {
        if !movable(pos) {
            continue;
        }
        let right = Position::new(pos.row, pos.col + 1);
        let down = Position::new(pos.row + 1, pos.col);
        for other in [right, down] {
            if other.row >= size || other.col >= size || !movable(other) {
                continue;
            }
            let Ok(trial) = grid.swapped(pos, other) else { continue };
            if has_match(&trial, min_len) {
                return Some((pos, other));
            }
        }
    }
    None
}

/// Does any single swap produce a match?
pub fn is_board_playable(grid: &Grid, min_len: usize) -> bool {
    find_hint(grid, min_len).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fixtures::{base_rows, grid_from, kind_five_rows};

    #[test]
    fn test_dead_board_has_no_hint() {
        let grid = grid_from(&base_rows());
        assert_eq!(find_hint(&grid, 3), None);
        assert!(!is_board_playable(&grid, 3));
    }

    #[test]
    fn test_hint_is_first_move_row_major() {
        // Legal moves: (0,4)-(1,4), (2,3)-(2,4), (3,1)-(4,1)
        let grid = grid_from(&kind_five_rows());
        assert_eq!(find_hint(&grid, 3), Some((Position::new(0, 4), Position::new(1, 4))));
        assert!(is_board_playable(&grid, 3));
    }

    #[test]
    fn test_obstacles_are_not_hinted() {
        // Moving the obstacle right would line up three 5s
        let mut rows = base_rows();
        rows[0] = [5, 5, 99, 5, 1, 6];
        let grid = grid_from(&rows);
        assert_eq!(find_hint(&grid, 3), None);
    }
}
