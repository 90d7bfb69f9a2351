//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};

/// Player database model with leaderboard aggregates.
///
/// Aggregate counters are mutated only when one of the player's games
/// finishes; players are never deleted.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, new)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i32,
    games_played: i32,
    games_won: i32,
    total_moves: i32,
    created_at: NaiveDateTime,
}

/// Game database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, new)]
#[diesel(table_name = schema::games)]
pub struct Game {
    id: i32,
    status: String,
    current_turn_number: i32,
    winner_id: Option<i32>,
    created_at: NaiveDateTime,
}

impl Game {
    /// Parses the stored status string into a [`GameStatus`] enum.
    pub fn parse_status(&self) -> Result<GameStatus, DbError> {
        GameStatus::from_db_string(self.status())
    }

    /// Derived turn owner: seat 1 on odd turn numbers, seat 2 on even.
    ///
    /// Returns `None` unless the game is in progress with both seats filled.
    /// Computed from state on every call, never persisted.
    pub fn current_turn_player_id(&self, seats: &[GamePlayer]) -> Option<i32> {
        if !matches!(self.parse_status(), Ok(GameStatus::InProgress)) || seats.len() < 2 {
            return None;
        }

        let seat = if self.current_turn_number % 2 == 1 { 1 } else { 2 };
        seats
            .iter()
            .find(|gp| *gp.player_order() == seat)
            .map(|gp| *gp.player_id())
    }
}

/// Insertable game model for creating new games.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    status: String,
}

/// Seat assignment linking a player to a game.
///
/// `player_order` is 1 for the creator and 2 for the joiner.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters, new)]
#[diesel(table_name = schema::game_players)]
#[diesel(primary_key(game_id, player_id))]
#[diesel(belongs_to(Game))]
#[diesel(belongs_to(Player))]
pub struct GamePlayer {
    game_id: i32,
    player_id: i32,
    player_order: i32,
    joined_at: NaiveDateTime,
}

/// Insertable seat assignment.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_players)]
pub struct NewGamePlayer {
    game_id: i32,
    player_id: i32,
    player_order: i32,
}

/// A single move in a game's log.
///
/// `position` is 0-8 in row-major order, `move_number` is the turn number at
/// which the move was played (1-based, unique per game).
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters, new)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(Game))]
pub struct Move {
    id: i32,
    game_id: i32,
    player_id: i32,
    position: i32,
    move_number: i32,
    created_at: NaiveDateTime,
}

/// Insertable move model.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::moves)]
pub struct NewMove {
    game_id: i32,
    player_id: i32,
    position: i32,
    move_number: i32,
}

/// Game lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Waiting for a second player to join.
    Waiting,
    /// Both seats filled, moves are being played.
    InProgress,
    /// Game ended with a win or a draw.
    Finished,
}

impl GameStatus {
    /// Converts status to the string stored in the database.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }

    /// Parses status from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid status value.
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "in_progress" => Ok(Self::InProgress),
            "finished" => Ok(Self::Finished),
            _ => Err(DbError::new(format!("Invalid game status: '{}'", s))),
        }
    }
}
