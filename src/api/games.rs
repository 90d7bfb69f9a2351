//! Game endpoints: create, join, inspect, and move.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::error::ApiError;
use super::schemas::{GameCreate, GameJoin, GamePublic, MoveCreate};
use crate::service::GameService;

/// `POST /games` - creates a game with the requesting player at seat 1.
#[instrument(skip(service, req), fields(player_id = req.player_id))]
pub async fn create_game(
    State(service): State<GameService>,
    Json(req): Json<GameCreate>,
) -> Result<(StatusCode, Json<GamePublic>), ApiError> {
    let snapshot = service.create_game(req.player_id)?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// `POST /games/{game_id}/join` - seats the second player and starts play.
#[instrument(skip(service, req), fields(player_id = req.player_id))]
pub async fn join_game(
    State(service): State<GameService>,
    Path(game_id): Path<i32>,
    Json(req): Json<GameJoin>,
) -> Result<Json<GamePublic>, ApiError> {
    let snapshot = service.join_game(game_id, req.player_id)?;
    Ok(Json(snapshot.into()))
}

/// `GET /games/available` - lists games waiting for a second player.
#[instrument(skip(service))]
pub async fn available_games(
    State(service): State<GameService>,
) -> Result<Json<Vec<GamePublic>>, ApiError> {
    let games = service.list_available_games()?;
    Ok(Json(games.into_iter().map(GamePublic::from).collect()))
}

/// `GET /games/{game_id}` - gets a game's status and projected grid.
#[instrument(skip(service))]
pub async fn get_game(
    State(service): State<GameService>,
    Path(game_id): Path<i32>,
) -> Result<Json<GamePublic>, ApiError> {
    let snapshot = service.get_game(game_id)?;
    Ok(Json(snapshot.into()))
}

/// `POST /games/{game_id}/move` - plays a move for the requesting player.
#[instrument(skip(service, req), fields(player_id = req.player_id, position = req.position))]
pub async fn make_move(
    State(service): State<GameService>,
    Path(game_id): Path<i32>,
    Json(req): Json<MoveCreate>,
) -> Result<Json<GamePublic>, ApiError> {
    if !(0..=8).contains(&req.position) {
        return Err(ApiError::bad_request("Position must be between 0 and 8"));
    }

    let snapshot = service.make_move(game_id, req.player_id, req.position as usize)?;
    Ok(Json(snapshot.into()))
}
