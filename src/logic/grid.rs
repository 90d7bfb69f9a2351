//! Board projection from the persisted move log.

use crate::db::{GamePlayer, Move};

/// 9-cell board in row-major order: 0 = empty, 1 = seat one, 2 = seat two.
pub type Grid = [u8; 9];

/// Projects the current board from an ordered move log and seat assignments.
///
/// Moves referencing a player without a seat are skipped; the validators run
/// before any move is recorded, so such moves should not exist.
pub fn project_grid(moves: &[Move], seats: &[GamePlayer]) -> Grid {
    let mut grid: Grid = [0; 9];

    for mv in moves {
        let Some(seat) = seats
            .iter()
            .find(|gp| gp.player_id() == mv.player_id())
            .map(|gp| *gp.player_order() as u8)
        else {
            continue;
        };

        if let Some(cell) = grid.get_mut(*mv.position() as usize) {
            *cell = seat;
        }
    }

    grid
}
