//! Win and draw detection.

use super::grid::Grid;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // Rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // Columns
    [0, 4, 8],
    [2, 4, 6], // Diagonals
];

/// Checks whether the given seat (1 or 2) occupies a full line.
pub fn has_won(grid: &Grid, seat: u8) -> bool {
    if seat == 0 {
        return false;
    }

    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&pos| grid[pos] == seat))
}

/// A draw is a full board with no winner for either seat.
pub fn is_draw(grid: &Grid) -> bool {
    if has_won(grid, 1) || has_won(grid, 2) {
        return false;
    }

    grid.iter().all(|&cell| cell != 0)
}
