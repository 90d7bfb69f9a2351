//! Guard functions checked before each game command.
//!
//! Rules are evaluated in order; the first failure wins and is returned as a
//! [`GameError`] carrying both the error kind and the user-facing reason.

use super::grid::Grid;
use crate::db::{Game, GamePlayer, GameStatus};
use crate::error::GameError;

/// Checks that a player is free to create or join a game.
///
/// A player with a Waiting or InProgress game must finish it first; the
/// rejection names that game's id and state.
///
/// # Errors
///
/// Returns `Conflict` if an unfinished game exists.
pub fn can_start_new_game(unfinished: Option<&Game>) -> Result<(), GameError> {
    if let Some(game) = unfinished {
        let status_msg = match game.parse_status()? {
            GameStatus::Waiting => "waiting for another player",
            _ => "in progress",
        };
        return Err(GameError::conflict(format!(
            "Player already has an unfinished game (ID: {}) that is {}. Complete that game first.",
            game.id(),
            status_msg
        )));
    }

    Ok(())
}

/// Checks that a game can accept the joining player as its second seat.
///
/// # Errors
///
/// Returns `NotFound` if the game does not exist; `Conflict` if the player
/// is already seated, the game has started or finished, or both seats are
/// taken.
pub fn can_join<'a>(
    game: Option<&'a Game>,
    seats: &[GamePlayer],
    player_id: i32,
) -> Result<&'a Game, GameError> {
    let game = game.ok_or_else(|| GameError::not_found("Game not found"))?;

    if seats.iter().any(|gp| *gp.player_id() == player_id) {
        return Err(GameError::conflict("Player already in game"));
    }

    if game.parse_status()? != GameStatus::Waiting {
        return Err(GameError::conflict("Game already started or finished"));
    }

    if seats.len() >= 2 {
        return Err(GameError::conflict("Game is full"));
    }

    Ok(game)
}

/// Checks that the game accepts a move from this player right now.
///
/// # Errors
///
/// Returns `NotFound` if the game does not exist; `Forbidden` if the player
/// is not seated; `Conflict` if the game is not in progress, has an empty
/// seat, or it is not the player's turn.
pub fn can_move<'a>(
    game: Option<&'a Game>,
    seats: &[GamePlayer],
    player_id: i32,
) -> Result<&'a Game, GameError> {
    let game = game.ok_or_else(|| GameError::not_found("Game not found"))?;

    if game.parse_status()? != GameStatus::InProgress {
        return Err(GameError::conflict("Game is not in progress"));
    }

    if seats.len() < 2 {
        return Err(GameError::conflict("Game is not full"));
    }

    if !seats.iter().any(|gp| *gp.player_id() == player_id) {
        return Err(GameError::forbidden("Player not in game"));
    }

    if game.current_turn_player_id(seats) != Some(player_id) {
        return Err(GameError::conflict("Not your turn"));
    }

    Ok(game)
}

/// Checks that the target cell is on the board and unoccupied.
///
/// # Errors
///
/// Returns `Conflict` if the cell is occupied or out of range.
pub fn cell_is_free(grid: &Grid, position: usize) -> Result<(), GameError> {
    match grid.get(position) {
        Some(0) => Ok(()),
        Some(_) => Err(GameError::conflict("Position already occupied")),
        None => Err(GameError::conflict("Position out of bounds (must be 0-8)")),
    }
}
