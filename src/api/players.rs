//! Player endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::error::ApiError;
use super::schemas::PlayerPublic;
use crate::service::GameService;

/// `POST /players` - creates a new player.
#[instrument(skip(service))]
pub async fn create_player(
    State(service): State<GameService>,
) -> Result<(StatusCode, Json<PlayerPublic>), ApiError> {
    let player = service.create_player()?;
    let message = format!("Player created with ID: {}", player.id());
    Ok((
        StatusCode::CREATED,
        Json(PlayerPublic::from_player(&player, Some(message))),
    ))
}

/// `GET /players/{player_id}` - gets a player by id.
#[instrument(skip(service))]
pub async fn get_player(
    State(service): State<GameService>,
    Path(player_id): Path<i32>,
) -> Result<Json<PlayerPublic>, ApiError> {
    let player = service.get_player(player_id)?;
    let message = format!("Player with ID: {} found", player.id());
    Ok(Json(PlayerPublic::from_player(&player, Some(message))))
}
