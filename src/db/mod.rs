//! Database persistence layer for players, games, seats, and moves.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{
    Game, GamePlayer, GameStatus, Move, NewGame, NewGamePlayer, NewMove, Player,
};
pub use repository::GameRepository;
