//! Shared board fixtures for unit tests.

use crate::core::ids::SequentialIds;
use crate::core::rng::RandomSource;
use crate::game::grid::Grid;

/// Settled 6x6 layout `(3r + c) % 9 + 1`: no runs and no legal swap.
pub fn base_rows() -> [[u8; 6]; 6] {
    let mut rows = [[0u8; 6]; 6];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((3 * r + c) % 9 + 1) as u8;
        }
    }
    rows
}

/// The base layout with row 2 set up so swapping (2,3)<->(2,4) lines up
/// three 5s on cols 1-3.
pub fn kind_five_rows() -> [[u8; 6]; 6] {
    let mut rows = base_rows();
    rows[2] = [7, 5, 5, 1, 5, 3];
    rows
}

/// Build a grid from codes; ids are `0..36` row-major.
pub fn grid_from(rows: &[[u8; 6]]) -> Grid {
    Grid::from_codes(rows, &mut SequentialIds::new()).expect("fixture rows are valid")
}

/// Random source returning the same value forever.
pub struct Constant(pub u64);

impl RandomSource for Constant {
    fn next_u64(&mut self) -> u64 {
        self.0
    }
}
