//! REST transport layer over the game service.

mod error;
mod games;
mod leaderboard;
mod players;
mod schemas;

use axum::Router;
use axum::routing::{get, post};

pub use error::ApiError;
pub use schemas::{
    GameCreate, GameJoin, GamePublic, MoveCreate, PlayerPublic, PlayerStatsPublic,
};

use crate::service::GameService;

/// Builds the REST router over the given service.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/players", post(players::create_player))
        .route("/players/{player_id}", get(players::get_player))
        .route("/games", post(games::create_game))
        .route("/games/available", get(games::available_games))
        .route("/games/{game_id}", get(games::get_game))
        .route("/games/{game_id}/join", post(games::join_game))
        .route("/games/{game_id}/move", post(games::make_move))
        .route("/leaderboard/wins", get(leaderboard::by_wins))
        .route("/leaderboard/win_rate", get(leaderboard::by_win_rate))
        .route("/leaderboard/efficiency", get(leaderboard::by_efficiency))
        .with_state(service)
}
